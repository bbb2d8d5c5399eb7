use crate::context::CCodeGen;
use crate::scan;
use slc_ast::{Declaration, Program};

impl CCodeGen {
    /// Phases 1, 3 and 4: user `#include` collection, the generated-file
    /// banner plus always-on and conditional headers, and the always-on
    /// runtime helpers (SPEC_FULL §4.4).
    pub fn emit_header_and_runtime(&mut self, program: &Program) {
        self.collect_user_includes(program);
        let usage = scan::scan(program);

        self.emit("/* Generated by slc, the SL-to-C transpiler */");
        let mut always: Vec<&str> = vec!["<stdio.h>", "<stdlib.h>", "<stdbool.h>", "<string.h>"];
        if usage.needs_string_helpers {
            always.push("<ctype.h>");
        }
        always.sort_unstable();
        always.dedup();
        for header in &always {
            self.emit(format!("#include {header}"));
        }

        let mut extra: Vec<&str> = usage.libc_headers.iter().copied().collect();
        if usage.needs_math {
            extra.push("<math.h>");
        }
        if usage.needs_try_catch {
            extra.push("<setjmp.h>");
        }
        extra.sort_unstable();
        extra.dedup();
        for header in extra {
            if !always.contains(&header) && !self.user_includes.contains(header) {
                self.emit(format!("#include {header}"));
            }
        }
        self.emit_blank();

        self.emit_helper("__sl_safe_realloc");
        self.emit_helper("__sl_safe_calloc");
        self.emit_helper("__sl_div_int");
        self.emit_helper("__sl_div_double");
        self.emit_helper("__sl_mod_int");

        if usage.needs_string_helpers {
            for name in [
                "__sl_substring", "__sl_trim", "__sl_concat", "__sl_toUpper", "__sl_toLower", "__sl_equals",
                "__sl_charAt", "__sl_indexOf", "__sl_lastIndexOf", "__sl_isEmpty", "__sl_startsWith",
                "__sl_endsWith", "__sl_strContains", "__sl_count", "__sl_find", "__sl_charLen",
                "__sl_intToString", "__sl_longToString", "__sl_floatToString", "__sl_doubleToString",
            ] {
                self.emit_helper(name);
            }
        }
        if usage.needs_math {
            for name in [
                "__sl_math_factorial", "__sl_math_gcd", "__sl_math_lcm", "__sl_math_fibonacci",
                "__sl_math_isPrime", "__sl_math_sum_int", "__sl_math_fsum",
            ] {
                self.emit_helper(name);
            }
        }
        if usage.needs_try_catch {
            for name in [
                "__sl_trycatch_globals", "__sl_cleanup_types", "__sl_register_cleanup",
                "__sl_run_cleanups", "__sl_discard_cleanups", "__sl_throw",
            ] {
                self.emit_helper(name);
            }
        }
    }

    fn collect_user_includes(&mut self, program: &Program) {
        for decl in &program.declarations {
            if let Declaration::Preprocessor(p) = decl {
                if let Some(header) = p.text.strip_prefix("#include") {
                    self.user_includes.insert(header.trim().to_string());
                }
                self.emit_raw(p.text.clone());
            }
        }
    }
}
