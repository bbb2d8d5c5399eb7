use slc_ast::TypeExpr;
use std::collections::HashMap;

/// A C-safe name built from a type expression (SPEC_FULL §4.4 phase 6, §6
/// "Generated C ABI"): `base_arg1_arg2_…` with pointer depth flattened to
/// trailing `_ptr` repetitions.
pub fn mangle_type(ty: &TypeExpr) -> String {
    if !ty.generic_args.is_empty() {
        let args: Vec<String> = ty.generic_args.iter().map(mangle_type).collect();
        return format!("{}_{}", ty.base, args.join("_"));
    }
    format!("{}{}", ty.base, "_ptr".repeat(ty.pointer_depth as usize))
}

/// The C spelling of a source type, including monomorphized container
/// struct names (`sl_List_int`, `sl_Map_string_int`, …).
pub fn type_to_c(ty: &TypeExpr, classes: &std::collections::HashSet<String>) -> String {
    let base = match ty.base.as_str() {
        "string" => "char*".to_string(),
        "List" if !ty.generic_args.is_empty() => format!("sl_List_{}", mangle_type(&ty.generic_args[0])),
        "Array" if !ty.generic_args.is_empty() => format!("sl_Array_{}", mangle_type(&ty.generic_args[0])),
        "Tuple" if !ty.generic_args.is_empty() => {
            let args: Vec<String> = ty.generic_args.iter().map(mangle_type).collect();
            format!("sl_Tuple_{}", args.join("_"))
        }
        "Map" if ty.generic_args.len() == 2 => {
            format!("sl_Map_{}_{}", mangle_type(&ty.generic_args[0]), mangle_type(&ty.generic_args[1]))
        }
        "Set" if !ty.generic_args.is_empty() => format!("sl_Set_{}", mangle_type(&ty.generic_args[0])),
        base if classes.contains(base) && !ty.generic_args.is_empty() => {
            let args: Vec<String> = ty.generic_args.iter().map(mangle_type).collect();
            format!("sl_{}_{}", base, args.join("_"))
        }
        other => other.to_string(),
    };

    format!("{base}{}", "*".repeat(ty.pointer_depth as usize))
}

/// Substitutes generic type parameters (by base name) with concrete types,
/// adding pointer depths (SPEC_FULL §4.4's monomorphization of user
/// generics).
pub fn substitute_type(ty: &TypeExpr, subs: &HashMap<String, TypeExpr>) -> TypeExpr {
    if let Some(concrete) = subs.get(&ty.base) {
        let mut result = concrete.clone();
        result.pointer_depth += ty.pointer_depth;
        return result;
    }
    let mut result = ty.clone();
    result.generic_args = ty.generic_args.iter().map(|a| substitute_type(a, subs)).collect();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use slc_ast::Pos;
    use std::collections::HashSet;

    fn pos() -> Pos {
        Pos::new(1, 1)
    }

    fn simple(base: &str) -> TypeExpr {
        TypeExpr::simple(base, pos())
    }

    fn generic(base: &str, args: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr { generic_args: args, ..TypeExpr::simple(base, pos()) }
    }

    #[test]
    fn mangle_flattens_pointer_depth_to_suffix() {
        let mut ty = simple("int");
        ty.pointer_depth = 2;
        assert_eq!(mangle_type(&ty), "int_ptr_ptr");
    }

    #[test]
    fn mangle_nests_generic_args() {
        let ty = generic("Map", vec![simple("string"), simple("int")]);
        assert_eq!(mangle_type(&ty), "Map_string_int");
    }

    #[test]
    fn type_to_c_maps_string_to_char_star() {
        let classes = HashSet::new();
        assert_eq!(type_to_c(&simple("string"), &classes), "char*");
    }

    #[test]
    fn type_to_c_names_monomorphized_containers() {
        let classes = HashSet::new();
        let list = generic("List", vec![simple("int")]);
        assert_eq!(type_to_c(&list, &classes), "sl_List_int");
        let map = generic("Map", vec![simple("string"), simple("int")]);
        assert_eq!(type_to_c(&map, &classes), "sl_Map_string_int");
    }

    #[test]
    fn type_to_c_names_monomorphized_user_generic_class() {
        let mut classes = HashSet::new();
        classes.insert("Box".to_string());
        let boxed = generic("Box", vec![simple("int")]);
        assert_eq!(type_to_c(&boxed, &classes), "sl_Box_int");
    }

    #[test]
    fn type_to_c_appends_pointer_stars() {
        let classes = HashSet::new();
        let mut ty = simple("int");
        ty.pointer_depth = 1;
        assert_eq!(type_to_c(&ty, &classes), "int*");
    }

    #[test]
    fn substitute_type_replaces_generic_param_and_keeps_pointer_depth() {
        let mut subs = HashMap::new();
        subs.insert("T".to_string(), simple("int"));
        let mut field_ty = simple("T");
        field_ty.pointer_depth = 1;
        let result = substitute_type(&field_ty, &subs);
        assert_eq!(result.base, "int");
        assert_eq!(result.pointer_depth, 1);
    }

    #[test]
    fn substitute_type_recurses_into_generic_args() {
        let mut subs = HashMap::new();
        subs.insert("T".to_string(), simple("string"));
        let list_of_t = generic("List", vec![simple("T")]);
        let result = substitute_type(&list_of_t, &subs);
        assert_eq!(result.base, "List");
        assert_eq!(result.generic_args[0].base, "string");
    }
}
