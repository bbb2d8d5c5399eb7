use crate::core::HelperDef;

pub const STRING_QUERY: &[(&str, HelperDef)] = &[
    (
        "__sl_charAt",
        HelperDef::new(
            r#"static inline char __sl_charAt(const char* s, int index) {
    if (!s || index < 0 || (size_t)index >= strlen(s)) {
        fprintf(stderr, "string index out of bounds: %d\n", index);
        exit(1);
    }
    return s[index];
}"#,
        ),
    ),
    (
        "__sl_indexOf",
        HelperDef::new(
            r#"static inline int __sl_indexOf(const char* s, const char* needle) {
    const char* p = strstr(s, needle);
    return p ? (int)(p - s) : -1;
}"#,
        ),
    ),
    (
        "__sl_lastIndexOf",
        HelperDef::new(
            r#"static inline int __sl_lastIndexOf(const char* s, const char* needle) {
    int slen = (int)strlen(s);
    int nlen = (int)strlen(needle);
    for (int i = slen - nlen; i >= 0; i--) {
        if (strncmp(s + i, needle, (size_t)nlen) == 0) {
            return i;
        }
    }
    return -1;
}"#,
        ),
    ),
    ("__sl_isEmpty", HelperDef::new("static inline int __sl_isEmpty(const char* s) {\n    return s == NULL || s[0] == '\\0';\n}")),
    (
        "__sl_startsWith",
        HelperDef::new(
            r#"static inline int __sl_startsWith(const char* s, const char* prefix) {
    size_t plen = strlen(prefix);
    return strncmp(s, prefix, plen) == 0;
}"#,
        ),
    ),
    (
        "__sl_endsWith",
        HelperDef::new(
            r#"static inline int __sl_endsWith(const char* s, const char* suffix) {
    size_t slen = strlen(s);
    size_t suflen = strlen(suffix);
    if (suflen > slen) return 0;
    return strcmp(s + (slen - suflen), suffix) == 0;
}"#,
        ),
    ),
    (
        "__sl_strContains",
        HelperDef::new(
            r#"static inline int __sl_strContains(const char* s, const char* needle) {
    return strstr(s, needle) != NULL;
}"#,
        ),
    ),
    (
        "__sl_count",
        HelperDef::new(
            r#"static inline int __sl_count(const char* s, const char* needle) {
    int count = 0;
    size_t nlen = strlen(needle);
    if (nlen == 0) return 0;
    const char* p = s;
    while ((p = strstr(p, needle)) != NULL) {
        count++;
        p += nlen;
    }
    return count;
}"#,
        ),
    ),
    (
        "__sl_find",
        HelperDef::new(
            r#"static inline int __sl_find(const char* s, const char* needle, int start) {
    size_t slen = strlen(s);
    if (start < 0 || (size_t)start > slen) return -1;
    const char* p = strstr(s + start, needle);
    return p ? (int)(p - s) : -1;
}"#,
        ),
    ),
    (
        "__sl_isDigitStr",
        HelperDef::new(
            r#"static inline int __sl_isDigitStr(const char* s) {
    if (!s || !*s) return 0;
    for (const char* p = s; *p; p++) {
        if (!isdigit((unsigned char)*p)) return 0;
    }
    return 1;
}"#,
        ),
    ),
    (
        "__sl_isAlphaStr",
        HelperDef::new(
            r#"static inline int __sl_isAlphaStr(const char* s) {
    if (!s || !*s) return 0;
    for (const char* p = s; *p; p++) {
        if (!isalpha((unsigned char)*p)) return 0;
    }
    return 1;
}"#,
        ),
    ),
    (
        "__sl_isBlank",
        HelperDef::new(
            r#"static inline int __sl_isBlank(const char* s) {
    if (!s) return 1;
    for (const char* p = s; *p; p++) {
        if (!isspace((unsigned char)*p)) return 0;
    }
    return 1;
}"#,
        ),
    ),
    (
        "__sl_isUpper",
        HelperDef::new(
            r#"static inline int __sl_isUpper(const char* s) {
    int has_alpha = 0;
    for (const char* p = s; *p; p++) {
        if (isalpha((unsigned char)*p)) {
            has_alpha = 1;
            if (!isupper((unsigned char)*p)) return 0;
        }
    }
    return has_alpha;
}"#,
        ),
    ),
    (
        "__sl_isLower",
        HelperDef::new(
            r#"static inline int __sl_isLower(const char* s) {
    int has_alpha = 0;
    for (const char* p = s; *p; p++) {
        if (isalpha((unsigned char)*p)) {
            has_alpha = 1;
            if (!islower((unsigned char)*p)) return 0;
        }
    }
    return has_alpha;
}"#,
        ),
    ),
    (
        "__sl_isAlnumStr",
        HelperDef::new(
            r#"static inline int __sl_isAlnumStr(const char* s) {
    if (!s || !*s) return 0;
    for (const char* p = s; *p; p++) {
        if (!isalnum((unsigned char)*p)) return 0;
    }
    return 1;
}"#,
        ),
    ),
    (
        "__sl_utf8_charlen",
        HelperDef::new(
            r#"static inline int __sl_utf8_charlen(const char* s) {
    int count = 0;
    for (const unsigned char* p = (const unsigned char*)s; *p; p++) {
        if ((*p & 0xC0) != 0x80) count++;
    }
    return count;
}"#,
        ),
    ),
    (
        "__sl_charLen",
        HelperDef::with_deps(
            r#"static inline int __sl_charLen(const char* s) {
    return __sl_utf8_charlen(s);
}"#,
            &["__sl_utf8_charlen"],
        ),
    ),
];
