use crate::core::HelperDef;

pub const STRING_CONVERT: &[(&str, HelperDef)] = &[
    (
        "__sl_intToString",
        HelperDef::new(
            r#"static inline char* __sl_intToString(int v) {
    char* buf = (char*)malloc(16);
    snprintf(buf, 16, "%d", v);
    return buf;
}"#,
        ),
    ),
    (
        "__sl_longToString",
        HelperDef::new(
            r#"static inline char* __sl_longToString(long v) {
    char* buf = (char*)malloc(24);
    snprintf(buf, 24, "%ld", v);
    return buf;
}"#,
        ),
    ),
    (
        "__sl_floatToString",
        HelperDef::new(
            r#"static inline char* __sl_floatToString(float v) {
    char* buf = (char*)malloc(32);
    snprintf(buf, 32, "%g", (double)v);
    return buf;
}"#,
        ),
    ),
    (
        "__sl_doubleToString",
        HelperDef::new(
            r#"static inline char* __sl_doubleToString(double v) {
    char* buf = (char*)malloc(32);
    snprintf(buf, 32, "%g", v);
    return buf;
}"#,
        ),
    ),
    (
        "__sl_charToString",
        HelperDef::new(
            r#"static inline char* __sl_charToString(char v) {
    char* buf = (char*)malloc(2);
    buf[0] = v;
    buf[1] = '\0';
    return buf;
}"#,
        ),
    ),
    (
        "__sl_fromInt",
        HelperDef::new(
            r#"static inline char* __sl_fromInt(int v) {
    char* buf = (char*)malloc(16);
    snprintf(buf, 16, "%d", v);
    return buf;
}"#,
        ),
    ),
    (
        "__sl_fromFloat",
        HelperDef::new(
            r#"static inline char* __sl_fromFloat(double v) {
    char* buf = (char*)malloc(32);
    snprintf(buf, 32, "%g", v);
    return buf;
}"#,
        ),
    ),
];
