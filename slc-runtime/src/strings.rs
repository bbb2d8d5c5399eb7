use crate::core::HelperDef;
use crate::strings_convert::STRING_CONVERT;
use crate::strings_ops::STRING_OPS;
use crate::strings_query::STRING_QUERY;

pub fn all() -> Vec<(&'static str, HelperDef)> {
    STRING_OPS
        .iter()
        .chain(STRING_QUERY.iter())
        .chain(STRING_CONVERT.iter())
        .copied()
        .collect()
}
