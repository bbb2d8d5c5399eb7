//! Lowers an analyzed program to a single C translation unit.
//!
//! `generate` runs the fixed phase order laid out in SPEC_FULL §4.4: headers
//! and runtime helpers, then struct declarations (forward decls, generic
//! containers, user classes), then the bodies (generic container functions,
//! globals/enums, lambdas, and finally every user declaration).

mod containers;
mod context;
mod declarations;
mod error;
mod expressions;
mod header;
mod lambda;
mod mangle;
mod scan;
mod statements;
mod structs;

pub use context::CCodeGen;
pub use error::CodegenError;

use slc_analyzer::AnalyzedProgram;

/// Translates an analyzed program into C source text.
pub fn generate(mut analyzed: AnalyzedProgram, debug: bool, source_file: String) -> Result<String, CodegenError> {
    log::debug!("codegen: starting for {source_file}");
    let mut gen = CCodeGen::new(
        analyzed.class_table.clone(),
        analyzed.function_table.clone(),
        analyzed.generic_instances.clone(),
        analyzed.node_types.clone(),
        debug,
        source_file,
    );

    // Phase 2 runs before the header/runtime phases: lambda bodies are
    // emitted into `gen.lambda_defs` while mutating `analyzed.program` in
    // place to stamp each LambdaExpr with its synthetic function name.
    gen.prescan_lambdas(&mut analyzed.program);

    // Phases 1, 3, 4.
    gen.emit_header_and_runtime(&analyzed.program);

    // Phase 5.
    gen.emit_forward_declarations();

    // Phase 6: Tuple/List/Array/Map/Set struct typedefs in that fixed
    // order, then monomorphized user generic classes.
    emit_generic_struct_typedefs(&mut gen);
    gen.emit_monomorphized_class_structs();

    // Phase 7.
    gen.emit_struct_definitions(&analyzed.program);

    // Phase 8.
    gen.emit_destroy_forward_declarations();

    // Phase 9: List family first (Map.keys/values depend on it), then Map,
    // then Set.
    emit_generic_function_bodies(&mut gen);

    // Phase 10.
    gen.emit_globals_and_enums(&analyzed.program);

    // Phase 11.
    gen.emit_function_forward_declarations(&analyzed.program);

    // Phase 12: splice in the lambda bodies collected during pre-scan.
    for def in std::mem::take(&mut gen.lambda_defs) {
        gen.emit_raw(def);
    }

    // Phase 13.
    gen.emit_declarations(&analyzed.program);

    log::debug!("codegen: finished, {} output lines", gen.output.len());
    Ok(gen.finish())
}

fn emit_generic_struct_typedefs(gen: &mut CCodeGen) {
    let mut emitted = std::collections::HashSet::new();

    if let Some(instances) = gen.generic_instances.get("Tuple").cloned() {
        for args in instances {
            let mangled_args: Vec<String> = args.iter().map(|a| gen.mangle(a)).collect();
            let key = format!("Tuple_{}", mangled_args.join("_"));
            if !emitted.insert(key) {
                continue;
            }
            let c_types: Vec<String> = args.iter().map(|a| gen.c_storage_type(a)).collect();
            gen.emit_tuple_struct_typedef(&mangled_args, &c_types);
        }
    }
    if let Some(instances) = gen.generic_instances.get("List").cloned() {
        for args in instances {
            let mangled = gen.mangle(&args[0]);
            let key = format!("List_{mangled}");
            if !emitted.insert(key) {
                continue;
            }
            let c_type = gen.c_storage_type(&args[0]);
            gen.emit_list_struct_typedef(&c_type, &mangled);
        }
    }
    if let Some(instances) = gen.generic_instances.get("Array").cloned() {
        for args in instances {
            let mangled = gen.mangle(&args[0]);
            let key = format!("Array_{mangled}");
            if !emitted.insert(key) {
                continue;
            }
            let c_type = gen.c_storage_type(&args[0]);
            gen.emit_array_struct_typedef(&c_type, &mangled);
        }
    }
    if let Some(instances) = gen.generic_instances.get("Map").cloned() {
        for args in instances {
            if args.len() != 2 {
                continue;
            }
            let k_mangled = gen.mangle(&args[0]);
            let v_mangled = gen.mangle(&args[1]);
            let key = format!("Map_{k_mangled}_{v_mangled}");
            if !emitted.insert(key) {
                continue;
            }
            let k_type = gen.c_storage_type(&args[0]);
            let v_type = gen.c_storage_type(&args[1]);
            gen.emit_map_struct_typedef(&k_type, &v_type, &k_mangled, &v_mangled);
        }
    }
    if let Some(instances) = gen.generic_instances.get("Set").cloned() {
        for args in instances {
            let mangled = gen.mangle(&args[0]);
            let key = format!("Set_{mangled}");
            if !emitted.insert(key) {
                continue;
            }
            let c_type = gen.c_storage_type(&args[0]);
            gen.emit_set_struct_typedef(&c_type, &mangled);
        }
    }
}

fn emit_generic_function_bodies(gen: &mut CCodeGen) {
    let mut emitted = std::collections::HashSet::new();

    if let Some(instances) = gen.generic_instances.get("List").cloned() {
        for args in instances {
            let mangled = gen.mangle(&args[0]);
            let key = format!("List_{mangled}");
            if !emitted.insert(key) {
                continue;
            }
            let c_type = gen.c_storage_type(&args[0]);
            gen.emit_list_functions(&c_type, &mangled);
        }
    }
    if let Some(instances) = gen.generic_instances.get("Map").cloned() {
        for args in instances {
            if args.len() != 2 {
                continue;
            }
            let k_mangled = gen.mangle(&args[0]);
            let v_mangled = gen.mangle(&args[1]);
            let key = format!("Map_{k_mangled}_{v_mangled}");
            if !emitted.insert(key) {
                continue;
            }
            let k_type = gen.c_storage_type(&args[0]);
            let v_type = gen.c_storage_type(&args[1]);
            gen.emit_map_functions(&k_type, &v_type, &k_mangled, &v_mangled);
        }
    }
    if let Some(instances) = gen.generic_instances.get("Set").cloned() {
        for args in instances {
            let mangled = gen.mangle(&args[0]);
            let key = format!("Set_{mangled}");
            if !emitted.insert(key) {
                continue;
            }
            let c_type = gen.c_storage_type(&args[0]);
            gen.emit_set_functions(&c_type, &mangled);
        }
    }
}
