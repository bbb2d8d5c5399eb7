use crate::core::HelperDef;

pub const HASH: &[(&str, HelperDef)] = &[(
    "__sl_hash_str",
    HelperDef::new(
        r#"static inline unsigned long __sl_hash_str(const char* s) {
    unsigned long h = 5381;
    while (*s) {
        h = ((h << 5) + h) + (unsigned char)(*s++);
    }
    return h;
}"#,
    ),
)];
