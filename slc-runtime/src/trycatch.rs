use crate::core::HelperDef;

pub const TRYCATCH: &[(&str, HelperDef)] = &[
    (
        "__sl_trycatch_globals",
        HelperDef::new(
            r#"#define __SL_TRY_STACK_MAX 64
static __thread jmp_buf __sl_try_stack[__SL_TRY_STACK_MAX];
static __thread int __sl_try_top = 0;
static __thread char __sl_error_msg[1024];"#,
        ),
    ),
    (
        "__sl_cleanup_types",
        HelperDef::with_deps(
            r#"typedef struct {
    void** ptr_ref;
    void (*destroy)(void*);
    int try_level;
} __sl_cleanup_entry;

#define __SL_CLEANUP_STACK_MAX 256
static __thread __sl_cleanup_entry __sl_cleanup_stack[__SL_CLEANUP_STACK_MAX];
static __thread int __sl_cleanup_top = 0;"#,
            &["__sl_trycatch_globals"],
        ),
    ),
    (
        "__sl_register_cleanup",
        HelperDef::with_deps(
            r#"static inline void __sl_register_cleanup(void** ptr_ref, void (*destroy)(void*)) {
    if (__sl_cleanup_top >= __SL_CLEANUP_STACK_MAX) {
        fprintf(stderr, "sl: cleanup stack overflow\n");
        exit(1);
    }
    __sl_cleanup_stack[__sl_cleanup_top].ptr_ref = ptr_ref;
    __sl_cleanup_stack[__sl_cleanup_top].destroy = destroy;
    __sl_cleanup_stack[__sl_cleanup_top].try_level = __sl_try_top;
    __sl_cleanup_top++;
}"#,
            &["__sl_cleanup_types"],
        ),
    ),
    (
        "__sl_run_cleanups",
        HelperDef::with_deps(
            r#"static inline void __sl_run_cleanups(int down_to_level) {
    while (__sl_cleanup_top > 0 && __sl_cleanup_stack[__sl_cleanup_top - 1].try_level >= down_to_level) {
        __sl_cleanup_top--;
        __sl_cleanup_entry* e = &__sl_cleanup_stack[__sl_cleanup_top];
        if (*e->ptr_ref) {
            e->destroy(*e->ptr_ref);
            *e->ptr_ref = NULL;
        }
    }
}"#,
            &["__sl_cleanup_types"],
        ),
    ),
    (
        "__sl_discard_cleanups",
        HelperDef::with_deps(
            r#"static inline void __sl_discard_cleanups(int down_to_level) {
    while (__sl_cleanup_top > 0 && __sl_cleanup_stack[__sl_cleanup_top - 1].try_level >= down_to_level) {
        __sl_cleanup_top--;
    }
}"#,
            &["__sl_cleanup_types"],
        ),
    ),
    (
        "__sl_throw",
        HelperDef::with_deps(
            r#"static inline void __sl_throw(const char* msg) {
    snprintf(__sl_error_msg, sizeof(__sl_error_msg), "%s", msg);
    __sl_run_cleanups(__sl_try_top);
    if (__sl_try_top <= 0) {
        fprintf(stderr, "uncaught exception: %s\n", __sl_error_msg);
        exit(1);
    }
    longjmp(__sl_try_stack[__sl_try_top - 1], 1);
}"#,
            &["__sl_trycatch_globals", "__sl_run_cleanups"],
        ),
    ),
];
