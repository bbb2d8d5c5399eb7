//! End-to-end golden tests for the six scenarios of SPEC_FULL §8
//! "Concrete end-to-end scenarios". Per §10.5, these assert on structural
//! properties of the generated C text (declaration presence/ordering,
//! exactly-once helper emission, `printf` format strings and argument
//! lists) rather than shelling out to a C compiler.

fn compile(source: &str) -> String {
    let program = slc_parser::Parser::parse_program(source).expect("parse");
    let analyzed = slc_analyzer::analyze(program).expect("analyze");
    assert!(!analyzed.diagnostics.has_errors(), "unexpected semantic errors: {:?}", analyzed.diagnostics);
    slc_codegen::generate(analyzed, false, "golden.sl".to_string()).expect("codegen")
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn hello_world_prints_with_trailing_newline() {
    let c = compile(r#"int main() { print("hello"); return 0; }"#);
    assert!(c.contains(r#"printf("hello\n")"#), "expected a bare printf call:\n{c}");
    assert_eq!(count_occurrences(&c, "int main("), 1);
}

#[test]
fn generic_container_and_inference_lowers_list_and_for_in() {
    let c = compile(
        r#"int main() {
            var nums = [10, 20, 30];
            int s = 0;
            for x in nums { s += x; }
            print(s);
            return 0;
        }"#,
    );
    // `var nums = [...]` infers `List<int>`: the monomorphized struct and
    // its `_new`/`_push` helpers must each be defined exactly once (their
    // bodies separately call themselves from `_reversed`/`_sorted`, so the
    // helper *definitions* are checked by signature, not by bare substring).
    assert_eq!(
        count_occurrences(&c, "static inline sl_List_int* sl_List_int_new(void) {"),
        1,
        "expected one List<int> constructor definition:\n{c}"
    );
    assert_eq!(
        count_occurrences(&c, "static inline void sl_List_int_push(sl_List_int* list, int val) {"),
        1,
        "expected one List<int> push helper definition:\n{c}"
    );
    assert!(c.contains("sl_List_int* nums = sl_List_int_new();"));
    assert_eq!(count_occurrences(&c, "sl_List_int_push(nums,"), 3, "expected one push per literal element:\n{c}");
    assert!(c.contains(r#"printf("%d\n", s)"#));
}

#[test]
fn class_inheritance_and_override_dispatch_on_static_type() {
    let c = compile(
        r#"class A { public int f() { return 1; } }
           class B extends A { public int f() { return 2; } }
           int main() { B* b = new B(); print(b.f()); return 0; }"#,
    );
    // Both `f` overrides are emitted under their owning class's prefix;
    // there is no vtable, so the call site dispatches on `b`'s static type.
    assert!(c.contains("int A_f(A* self) {"));
    assert!(c.contains("int B_f(B* self) {"));
    assert!(c.contains("B_f(b)"));
    assert!(!c.contains("A_f(b)"));
    assert_eq!(count_occurrences(&c, "B* B_new("), 1);
}

#[test]
fn try_catch_targets_the_runtime_cleanup_stack() {
    let c = compile(
        r#"int main() {
            try {
                throw "boom";
            } catch (e) {
                print(e);
            }
            return 0;
        }"#,
    );
    assert!(c.contains("setjmp(__sl_try_stack[__sl_try_top - 1])"));
    assert!(c.contains("__sl_throw(\"boom\")"));
    assert!(c.contains("const char* e = __sl_error_msg;"));
    assert_eq!(count_occurrences(&c, "__SL_TRY_STACK_MAX"), 1, "helper struct/macro should be defined once:\n{c}");
}

#[test]
fn map_with_string_keys_builds_puts_and_iterates_both_bindings() {
    let c = compile(
        r#"int main() {
            Map<string, int> m = {"a": 1, "b": 2, "c": 3};
            for k, v in m { print(k, v); }
            return 0;
        }"#,
    );
    assert_eq!(count_occurrences(&c, "static inline sl_Map_string_int* sl_Map_string_int_new(void) {"), 1);
    assert_eq!(
        count_occurrences(
            &c,
            "static inline void sl_Map_string_int_put(sl_Map_string_int* map, char* key, int value) {"
        ),
        1,
        "put helper defined exactly once:\n{c}"
    );
    // Three inserts at the call site; the helper itself also calls back into
    // `_put` from its own `_resize` on growth, which is a separate call site.
    assert!(count_occurrences(&c, "sl_Map_string_int_put(m,") >= 3);
    assert!(c.contains("m->occupied[__sl_i_k]"));
    assert!(c.contains(r#"printf("%s %d\n", k, v)"#));
}

#[test]
fn non_exhaustive_return_is_flagged_at_the_function_line() {
    let program = slc_parser::Parser::parse_program("int f() { if (true) { return 1; } }").expect("parse");
    let analyzed = slc_analyzer::analyze(program).expect("analyze");
    assert!(analyzed.diagnostics.has_errors());
    let messages: Vec<String> =
        analyzed.diagnostics.diagnostics().iter().map(|d| d.message.clone()).collect();
    assert!(
        messages.iter().any(|m| m.contains("non-void return type") && m.contains("no return statement")),
        "expected a non-exhaustive-return diagnostic, got: {messages:?}"
    );
}
