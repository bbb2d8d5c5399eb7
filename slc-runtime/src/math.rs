use crate::core::HelperDef;

pub const MATH: &[(&str, HelperDef)] = &[
    (
        "__sl_math_factorial",
        HelperDef::new(
            r#"static inline long __sl_math_factorial(int n) {
    long result = 1;
    for (int i = 2; i <= n; i++) {
        result *= i;
    }
    return result;
}"#,
        ),
    ),
    (
        "__sl_math_gcd",
        HelperDef::new(
            r#"static inline long __sl_math_gcd(long a, long b) {
    while (b != 0) {
        long t = b;
        b = a % b;
        a = t;
    }
    return a < 0 ? -a : a;
}"#,
        ),
    ),
    (
        "__sl_math_lcm",
        HelperDef::with_deps(
            r#"static inline long __sl_math_lcm(long a, long b) {
    if (a == 0 || b == 0) return 0;
    long g = __sl_math_gcd(a, b);
    long result = (a / g) * b;
    return result < 0 ? -result : result;
}"#,
            &["__sl_math_gcd"],
        ),
    ),
    (
        "__sl_math_fibonacci",
        HelperDef::new(
            r#"static inline long __sl_math_fibonacci(int n) {
    if (n <= 1) return n;
    long a = 0, b = 1;
    for (int i = 2; i <= n; i++) {
        long c = a + b;
        a = b;
        b = c;
    }
    return b;
}"#,
        ),
    ),
    (
        "__sl_math_isPrime",
        HelperDef::new(
            r#"static inline int __sl_math_isPrime(long n) {
    if (n < 2) return 0;
    for (long i = 2; i * i <= n; i++) {
        if (n % i == 0) return 0;
    }
    return 1;
}"#,
        ),
    ),
    (
        "__sl_math_sum_int",
        HelperDef::new(
            r#"static inline long __sl_math_sum_int(const int* arr, int len) {
    long sum = 0;
    for (int i = 0; i < len; i++) {
        sum += arr[i];
    }
    return sum;
}"#,
        ),
    ),
    (
        "__sl_math_fsum",
        HelperDef::new(
            r#"static inline double __sl_math_fsum(const double* arr, int len) {
    double sum = 0.0;
    for (int i = 0; i < len; i++) {
        sum += arr[i];
    }
    return sum;
}"#,
        ),
    ),
];
