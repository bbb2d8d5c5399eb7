use crate::core::HelperDef;

pub const CYCLES: &[(&str, HelperDef)] = &[
    (
        "__sl_suspect_buf",
        HelperDef::new(
            r#"#define __SL_SUSPECT_MAX 256
typedef void (*__sl_visit_fn)(void*, void (*)(void*, int));
typedef void (*__sl_destroy_fn)(void*);

static void* __sl_suspects[__SL_SUSPECT_MAX];
static __sl_visit_fn __sl_suspect_visit[__SL_SUSPECT_MAX];
static __sl_destroy_fn __sl_suspect_destroy[__SL_SUSPECT_MAX];
static int __sl_suspect_trial[__SL_SUSPECT_MAX];
static int __sl_suspect_count = 0;

static inline void __sl_suspect(void* obj, __sl_visit_fn visit, __sl_destroy_fn destroy) {
    if (__sl_suspect_count >= __SL_SUSPECT_MAX) {
        return;
    }
    __sl_suspects[__sl_suspect_count] = obj;
    __sl_suspect_visit[__sl_suspect_count] = visit;
    __sl_suspect_destroy[__sl_suspect_count] = destroy;
    __sl_suspect_count++;
}"#,
        ),
    ),
    (
        "__sl_collect_cycles",
        HelperDef::with_deps(
            r#"static void __sl_trial_decrement(void* child, int delta) {
    for (int i = 0; i < __sl_suspect_count; i++) {
        if (__sl_suspects[i] == child) {
            __sl_suspect_trial[i] += delta;
        }
    }
}

static inline void __sl_collect_cycles(void) {
    for (int i = 0; i < __sl_suspect_count; i++) {
        __sl_suspect_trial[i] = 0;
    }
    for (int i = 0; i < __sl_suspect_count; i++) {
        if (__sl_suspect_visit[i]) {
            __sl_suspect_visit[i](__sl_suspects[i], __sl_trial_decrement);
        }
    }
    for (int i = 0; i < __sl_suspect_count; i++) {
        if (__sl_suspect_trial[i] <= 0 && __sl_suspects[i]) {
            __sl_suspect_destroy[i](__sl_suspects[i]);
            __sl_suspects[i] = NULL;
        }
    }
    __sl_suspect_count = 0;
}"#,
            &["__sl_suspect_buf"],
        ),
    ),
];
