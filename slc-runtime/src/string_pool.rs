use crate::core::HelperDef;

pub const STRING_POOL: &[(&str, HelperDef)] = &[
    (
        "__sl_str_pool_globals",
        HelperDef::new(
            r#"static char** __sl_str_pool = NULL;
static int __sl_str_pool_cap = 0;
static int __sl_str_pool_top = 0;"#,
        ),
    ),
    (
        "__sl_str_track",
        HelperDef::with_deps(
            r#"static inline char* __sl_str_track(char* s) {
    if (__sl_str_pool_top >= __sl_str_pool_cap) {
        int new_cap = __sl_str_pool_cap == 0 ? 64 : __sl_str_pool_cap * 2;
        __sl_str_pool = (char**)__sl_safe_realloc(__sl_str_pool, (size_t)new_cap * sizeof(char*));
        __sl_str_pool_cap = new_cap;
    }
    __sl_str_pool[__sl_str_pool_top++] = s;
    return s;
}"#,
            &["__sl_str_pool_globals", "__sl_safe_realloc"],
        ),
    ),
    (
        "__sl_str_flush",
        HelperDef::with_deps(
            r#"static inline void __sl_str_flush(void) {
    for (int i = 0; i < __sl_str_pool_top; i++) {
        free(__sl_str_pool[i]);
        __sl_str_pool[i] = NULL;
    }
    __sl_str_pool_top = 0;
}"#,
            &["__sl_str_pool_globals"],
        ),
    ),
];
