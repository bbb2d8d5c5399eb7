use crate::core::HelperDef;

pub const ALLOC: &[(&str, HelperDef)] = &[
    (
        "__sl_safe_realloc",
        HelperDef::new(
            r#"static inline void* __sl_safe_realloc(void* ptr, size_t size) {
    void* p = realloc(ptr, size);
    if (!p && size != 0) {
        fprintf(stderr, "sl: out of memory (realloc %zu bytes)\n", size);
        exit(1);
    }
    return p;
}"#,
        ),
    ),
    (
        "__sl_safe_calloc",
        HelperDef::new(
            r#"static inline void* __sl_safe_calloc(size_t count, size_t size) {
    void* p = calloc(count, size);
    if (!p && count != 0 && size != 0) {
        fprintf(stderr, "sl: out of memory (calloc %zu x %zu bytes)\n", count, size);
        exit(1);
    }
    return p;
}"#,
        ),
    ),
];
