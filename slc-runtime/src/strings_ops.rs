use crate::core::HelperDef;

/// Transforming string operations. Not present in the retrieved reference
/// sources (the aggregator there references a sibling module that never
/// shipped); authored here in the same malloc/snprintf idiom as the
/// sibling query/convert helpers to cover the methods `slc-analyzer`'s
/// type inference already recognizes (`substring`, `trim`, `concat`,
/// `toUpper`, `toLower`, `equals`).
pub const STRING_OPS: &[(&str, HelperDef)] = &[
    (
        "__sl_substring",
        HelperDef::new(
            r#"static inline char* __sl_substring(const char* s, int start, int end) {
    int slen = (int)strlen(s);
    if (start < 0) start = 0;
    if (end > slen) end = slen;
    if (start > end) start = end;
    int len = end - start;
    char* buf = (char*)malloc((size_t)len + 1);
    memcpy(buf, s + start, (size_t)len);
    buf[len] = '\0';
    return buf;
}"#,
        ),
    ),
    (
        "__sl_trim",
        HelperDef::new(
            r#"static inline char* __sl_trim(const char* s) {
    const char* start = s;
    while (*start && isspace((unsigned char)*start)) start++;
    const char* end = s + strlen(s);
    while (end > start && isspace((unsigned char)*(end - 1))) end--;
    size_t len = (size_t)(end - start);
    char* buf = (char*)malloc(len + 1);
    memcpy(buf, start, len);
    buf[len] = '\0';
    return buf;
}"#,
        ),
    ),
    (
        "__sl_concat",
        HelperDef::new(
            r#"static inline char* __sl_concat(const char* a, const char* b) {
    size_t alen = strlen(a);
    size_t blen = strlen(b);
    char* buf = (char*)malloc(alen + blen + 1);
    memcpy(buf, a, alen);
    memcpy(buf + alen, b, blen);
    buf[alen + blen] = '\0';
    return buf;
}"#,
        ),
    ),
    (
        "__sl_toUpper",
        HelperDef::new(
            r#"static inline char* __sl_toUpper(const char* s) {
    size_t len = strlen(s);
    char* buf = (char*)malloc(len + 1);
    for (size_t i = 0; i < len; i++) {
        buf[i] = (char)toupper((unsigned char)s[i]);
    }
    buf[len] = '\0';
    return buf;
}"#,
        ),
    ),
    (
        "__sl_toLower",
        HelperDef::new(
            r#"static inline char* __sl_toLower(const char* s) {
    size_t len = strlen(s);
    char* buf = (char*)malloc(len + 1);
    for (size_t i = 0; i < len; i++) {
        buf[i] = (char)tolower((unsigned char)s[i]);
    }
    buf[len] = '\0';
    return buf;
}"#,
        ),
    ),
    (
        "__sl_equals",
        HelperDef::new(
            r#"static inline int __sl_equals(const char* a, const char* b) {
    return strcmp(a, b) == 0;
}"#,
        ),
    ),
];
