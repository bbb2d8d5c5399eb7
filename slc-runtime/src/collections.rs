//! Templated higher-order-function helpers for monomorphized container
//! types (SPEC_FULL §4.3 generics, §4.4 phase 4). Unlike the other
//! categories these can't live as static source text: each one is
//! specialized per concrete element (`{name}`/`{c_type}`) or key/value
//! (`{k_type}`/`{v_type}`) pair that codegen has already registered via
//! `slc-analyzer`'s generic-instance collection, so they're rendered on
//! demand instead of interned ahead of time.

pub fn list_for_each(name: &str, c_type: &str) -> String {
    format!(
        r#"static inline void {name}_forEach({name}* list, void (*fn)({c_type})) {{
    for (int i = 0; i < list->len; i++) {{
        fn(list->data[i]);
    }}
}}"#,
        name = name,
        c_type = c_type
    )
}

pub fn list_filter(name: &str, c_type: &str) -> String {
    format!(
        r#"static inline {name}* {name}_filter({name}* list, int (*pred)({c_type})) {{
    {name}* result = {name}_new();
    for (int i = 0; i < list->len; i++) {{
        if (pred(list->data[i])) {{
            {name}_push(result, list->data[i]);
        }}
    }}
    return result;
}}"#,
        name = name,
        c_type = c_type
    )
}

pub fn list_any(name: &str, c_type: &str) -> String {
    format!(
        r#"static inline int {name}_any({name}* list, int (*pred)({c_type})) {{
    for (int i = 0; i < list->len; i++) {{
        if (pred(list->data[i])) return 1;
    }}
    return 0;
}}"#,
        name = name,
        c_type = c_type
    )
}

pub fn list_all(name: &str, c_type: &str) -> String {
    format!(
        r#"static inline int {name}_all({name}* list, int (*pred)({c_type})) {{
    for (int i = 0; i < list->len; i++) {{
        if (!pred(list->data[i])) return 0;
    }}
    return 1;
}}"#,
        name = name,
        c_type = c_type
    )
}

pub fn list_find_index(name: &str, c_type: &str) -> String {
    format!(
        r#"static inline int {name}_findIndex({name}* list, int (*pred)({c_type})) {{
    for (int i = 0; i < list->len; i++) {{
        if (pred(list->data[i])) return i;
    }}
    return -1;
}}"#,
        name = name,
        c_type = c_type
    )
}

pub fn list_map(src_name: &str, src_type: &str, dst_name: &str, dst_type: &str) -> String {
    format!(
        r#"static inline {dst_name}* {src_name}_map({src_name}* list, {dst_type} (*fn)({src_type})) {{
    {dst_name}* result = {dst_name}_new();
    for (int i = 0; i < list->len; i++) {{
        {dst_name}_push(result, fn(list->data[i]));
    }}
    return result;
}}"#,
        src_name = src_name,
        src_type = src_type,
        dst_name = dst_name,
        dst_type = dst_type
    )
}

pub fn list_reduce(name: &str, c_type: &str, acc_type: &str) -> String {
    format!(
        r#"static inline {acc_type} {name}_reduce({name}* list, {acc_type} (*fn)({acc_type}, {c_type}), {acc_type} init) {{
    {acc_type} acc = init;
    for (int i = 0; i < list->len; i++) {{
        acc = fn(acc, list->data[i]);
    }}
    return acc;
}}"#,
        name = name,
        c_type = c_type,
        acc_type = acc_type
    )
}

pub fn map_for_each(name: &str, k_type: &str, v_type: &str) -> String {
    format!(
        r#"static inline void {name}_forEach({name}* map, void (*fn)({k_type}, {v_type})) {{
    for (int i = 0; i < map->cap; i++) {{
        if (map->occupied[i]) {{
            fn(map->keys[i], map->values[i]);
        }}
    }}
}}"#,
        name = name,
        k_type = k_type,
        v_type = v_type
    )
}

pub fn map_contains_value(name: &str, v_type: &str, val_eq: &str) -> String {
    format!(
        r#"static inline int {name}_containsValue({name}* map, {v_type} target) {{
    for (int i = 0; i < map->cap; i++) {{
        if (map->occupied[i] && {val_eq}(map->values[i], target)) {{
            return 1;
        }}
    }}
    return 0;
}}"#,
        name = name,
        v_type = v_type,
        val_eq = val_eq
    )
}

pub fn set_for_each(name: &str, c_type: &str) -> String {
    format!(
        r#"static inline void {name}_forEach({name}* set, void (*fn)({c_type})) {{
    for (int i = 0; i < set->cap; i++) {{
        if (set->occupied[i]) {{
            fn(set->keys[i]);
        }}
    }}
}}"#,
        name = name,
        c_type = c_type
    )
}

pub fn set_filter(name: &str, c_type: &str) -> String {
    format!(
        r#"static inline {name}* {name}_filter({name}* set, int (*pred)({c_type})) {{
    {name}* result = {name}_new();
    for (int i = 0; i < set->cap; i++) {{
        if (set->occupied[i] && pred(set->keys[i])) {{
            {name}_add(result, set->keys[i]);
        }}
    }}
    return result;
}}"#,
        name = name,
        c_type = c_type
    )
}

pub fn set_any(name: &str, c_type: &str) -> String {
    format!(
        r#"static inline int {name}_any({name}* set, int (*pred)({c_type})) {{
    for (int i = 0; i < set->cap; i++) {{
        if (set->occupied[i] && pred(set->keys[i])) return 1;
    }}
    return 0;
}}"#,
        name = name,
        c_type = c_type
    )
}

pub fn set_all(name: &str, c_type: &str) -> String {
    format!(
        r#"static inline int {name}_all({name}* set, int (*pred)({c_type})) {{
    for (int i = 0; i < set->cap; i++) {{
        if (set->occupied[i] && !pred(set->keys[i])) return 0;
    }}
    return 1;
}}"#,
        name = name,
        c_type = c_type
    )
}

pub fn set_find_index(name: &str, c_type: &str) -> String {
    format!(
        r#"static inline int {name}_findIndex({name}* set, int (*pred)({c_type})) {{
    int idx = 0;
    for (int i = 0; i < set->cap; i++) {{
        if (set->occupied[i]) {{
            if (pred(set->keys[i])) return idx;
            idx++;
        }}
    }}
    return -1;
}}"#,
        name = name,
        c_type = c_type
    )
}
