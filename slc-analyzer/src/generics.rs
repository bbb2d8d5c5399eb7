use slc_ast::TypeExpr;
use std::collections::HashMap;

/// Walks a type expression, registering every generic instantiation found
/// (SPEC_FULL §3, §4.3). `Map<K,V>` additionally registers `List<K>` and
/// `List<V>` (so `.keys()`/`.values()` have concrete element types) and
/// `Set<T>` additionally registers `List<T>` (for `.toList()`).
pub fn collect(ty: &TypeExpr, instances: &mut HashMap<String, Vec<Vec<TypeExpr>>>) {
    if ty.generic_args.is_empty() {
        return;
    }

    let bucket = instances.entry(ty.base.clone()).or_default();
    if !bucket.iter().any(|existing| existing == &ty.generic_args) {
        bucket.push(ty.generic_args.clone());
    }

    for arg in &ty.generic_args {
        collect(arg, instances);
    }

    match ty.base.as_str() {
        "Map" if ty.generic_args.len() == 2 => {
            if let Some(key) = ty.generic_args.first().cloned() {
                collect(&list_of(key, ty.pos), instances);
            }
            if let Some(value) = ty.generic_args.get(1).cloned() {
                collect(&list_of(value, ty.pos), instances);
            }
        }
        "Set" if ty.generic_args.len() == 1 => {
            if let Some(elem) = ty.generic_args.first().cloned() {
                collect(&list_of(elem, ty.pos), instances);
            }
        }
        _ => {}
    }
}

fn list_of(elem: TypeExpr, pos: slc_ast::Pos) -> TypeExpr {
    let mut list = TypeExpr::simple("List", pos);
    list.generic_args = vec![elem];
    list
}

/// Expected generic argument count for built-in containers; `None` means
/// "not a built-in" (user generics are checked against their own
/// `generic_params` length instead).
pub fn builtin_arity(base: &str) -> Option<usize> {
    match base {
        "List" | "Array" | "Set" => Some(1),
        "Map" => Some(2),
        _ => None,
    }
}
