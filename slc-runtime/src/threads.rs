use crate::core::HelperDef;

pub const THREADS: &[(&str, HelperDef)] = &[
    (
        "__sl_thread_spawn",
        HelperDef::new(
            r#"typedef struct {
    pthread_t handle;
    void* (*fn)(void*);
    void* arg;
} __sl_thread;

static void* __sl_thread_wrapper(void* raw) {
    __sl_thread* t = (__sl_thread*)raw;
    return t->fn(t->arg);
}

static inline __sl_thread* __sl_thread_spawn(void* (*fn)(void*), void* arg) {
    __sl_thread* t = (__sl_thread*)malloc(sizeof(__sl_thread));
    t->fn = fn;
    t->arg = arg;
    if (pthread_create(&t->handle, NULL, __sl_thread_wrapper, t) != 0) {
        fprintf(stderr, "sl: failed to spawn thread\n");
        exit(1);
    }
    return t;
}"#,
        ),
    ),
    (
        "__sl_thread_join",
        HelperDef::with_deps(
            r#"static inline void* __sl_thread_join(__sl_thread* t) {
    void* result = NULL;
    pthread_join(t->handle, &result);
    return result;
}"#,
            &["__sl_thread_spawn"],
        ),
    ),
    (
        "__sl_thread_free",
        HelperDef::with_deps(
            r#"static inline void __sl_thread_free(__sl_thread* t) {
    free(t);
}"#,
            &["__sl_thread_spawn"],
        ),
    ),
    (
        "__sl_mutex_val_create",
        HelperDef::new(
            r#"typedef struct {
    pthread_mutex_t lock;
    void* value;
} __sl_mutex_val;

static inline __sl_mutex_val* __sl_mutex_val_create(void* initial) {
    __sl_mutex_val* m = (__sl_mutex_val*)malloc(sizeof(__sl_mutex_val));
    pthread_mutex_init(&m->lock, NULL);
    m->value = initial;
    return m;
}"#,
        ),
    ),
    (
        "__sl_mutex_val_get",
        HelperDef::with_deps(
            r#"static inline void* __sl_mutex_val_get(__sl_mutex_val* m) {
    pthread_mutex_lock(&m->lock);
    void* v = m->value;
    pthread_mutex_unlock(&m->lock);
    return v;
}"#,
            &["__sl_mutex_val_create"],
        ),
    ),
    (
        "__sl_mutex_val_set",
        HelperDef::with_deps(
            r#"static inline void __sl_mutex_val_set(__sl_mutex_val* m, void* value) {
    pthread_mutex_lock(&m->lock);
    m->value = value;
    pthread_mutex_unlock(&m->lock);
}"#,
            &["__sl_mutex_val_create"],
        ),
    ),
    (
        "__sl_mutex_val_destroy",
        HelperDef::with_deps(
            r#"static inline void __sl_mutex_val_destroy(__sl_mutex_val* m) {
    pthread_mutex_destroy(&m->lock);
    free(m);
}"#,
            &["__sl_mutex_val_create"],
        ),
    ),
];
