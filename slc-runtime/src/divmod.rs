use crate::core::HelperDef;

pub const DIVMOD: &[(&str, HelperDef)] = &[
    (
        "__sl_div_int",
        HelperDef::new(
            r#"static inline int __sl_div_int(int a, int b) {
    if (b == 0) {
        fprintf(stderr, "Division by zero\n");
        exit(1);
    }
    return a / b;
}"#,
        ),
    ),
    (
        "__sl_div_double",
        HelperDef::new(
            r#"static inline double __sl_div_double(double a, double b) {
    if (b == 0.0) {
        fprintf(stderr, "Division by zero\n");
        exit(1);
    }
    return a / b;
}"#,
        ),
    ),
    (
        "__sl_mod_int",
        HelperDef::new(
            r#"static inline int __sl_mod_int(int a, int b) {
    if (b == 0) {
        fprintf(stderr, "Modulo by zero\n");
        exit(1);
    }
    return a % b;
}"#,
        ),
    ),
];
