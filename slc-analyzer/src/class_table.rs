use slc_ast::{ClassDecl, ClassMember, FieldDecl, FunctionDecl, MethodDecl, PropertyDecl};
use slc_diagnostics::{DiagnosticEngine, Span};
use std::collections::HashMap;

/// Registered shape of one class: its own and inherited fields/methods,
/// its declared properties, and its constructor if any (SPEC_FULL §4.3
/// pass 1).
#[derive(Debug, Clone, Default)]
pub struct ClassInfo {
    pub name: String,
    pub generic_params: Vec<String>,
    pub fields: HashMap<String, FieldDecl>,
    pub methods: HashMap<String, MethodDecl>,
    pub properties: HashMap<String, PropertyDecl>,
    pub constructor: Option<MethodDecl>,
    pub parent: Option<String>,
}

/// A function's registered shape; `body` is `None` for a forward
/// declaration not yet (or never) defined.
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub decl: FunctionDecl,
    pub defined: bool,
}

/// Pass 1: register every class and top-level function, resolve the
/// parent chain, and detect duplicate names / inheritance cycles.
pub fn register_declarations(
    program: &slc_ast::Program,
    file: &str,
    diagnostics: &mut DiagnosticEngine,
) -> (HashMap<String, ClassInfo>, HashMap<String, FunctionInfo>) {
    let mut classes: HashMap<String, ClassInfo> = HashMap::new();
    let mut order: Vec<&ClassDecl> = Vec::new();

    for decl in &program.declarations {
        if let slc_ast::Declaration::Class(class) = decl {
            order.push(class);
        }
    }

    // Register in source order so a parent already seen earlier is
    // available when its child is registered. A parent declared later in
    // the file, or a cycle, is left unresolved and diagnosed below.
    for class in &order {
        log::debug!("analyzer pass 1: registering class {}", class.name);
        register_one_class(class, file, &mut classes, diagnostics);
    }

    for class in &order {
        check_inheritance_cycle(class, &classes, file, diagnostics);
    }

    let mut functions: HashMap<String, FunctionInfo> = HashMap::new();
    for decl in &program.declarations {
        if let slc_ast::Declaration::Function(func) = decl {
            log::debug!("analyzer pass 1: registering function {}", func.name);
            register_function(func, file, &mut functions, diagnostics);
        }
    }
    log::info!("analyzer pass 1: registered {} classes, {} functions", classes.len(), functions.len());

    (classes, functions)
}

fn register_one_class(
    class: &ClassDecl,
    file: &str,
    classes: &mut HashMap<String, ClassInfo>,
    diagnostics: &mut DiagnosticEngine,
) {
    if classes.contains_key(&class.name) {
        diagnostics.duplicate_declaration("class", &class.name, span_of(file, class.pos));
        return;
    }

    let mut info = ClassInfo {
        name: class.name.clone(),
        generic_params: class.generic_params.clone(),
        parent: class.parent.clone(),
        ..ClassInfo::default()
    };

    if let Some(parent_name) = &class.parent {
        if let Some(parent_info) = classes.get(parent_name) {
            for (fname, field) in &parent_info.fields {
                info.fields.insert(fname.clone(), field.clone());
            }
            for (mname, method) in &parent_info.methods {
                if *mname != parent_info.name {
                    info.methods.insert(mname.clone(), method.clone());
                }
            }
            for (pname, prop) in &parent_info.properties {
                info.properties.insert(pname.clone(), prop.clone());
            }
        }
    }

    for member in &class.members {
        match member {
            ClassMember::Field(field) => {
                if info.fields.contains_key(&field.name) && info.parent.is_none() {
                    diagnostics.duplicate_declaration("field", &field.name, span_of(file, field.pos));
                }
                info.fields.insert(field.name.clone(), field.clone());
            }
            ClassMember::Method(method) => {
                if method.name == class.name {
                    info.constructor = Some(method.clone());
                }
                if info.methods.contains_key(&method.name) && info.parent.is_none() {
                    diagnostics.duplicate_declaration("method", &method.name, span_of(file, method.pos));
                }
                info.methods.insert(method.name.clone(), method.clone());
            }
            ClassMember::Property(prop) => {
                info.properties.insert(prop.name.clone(), prop.clone());
            }
        }
    }

    classes.insert(class.name.clone(), info);
}

fn check_inheritance_cycle(
    class: &ClassDecl,
    classes: &HashMap<String, ClassInfo>,
    file: &str,
    diagnostics: &mut DiagnosticEngine,
) {
    let mut seen = vec![class.name.clone()];
    let mut current = class.parent.clone();
    while let Some(name) = current {
        if seen.contains(&name) {
            diagnostics.cyclic_inheritance(&class.name, span_of(file, class.pos));
            return;
        }
        seen.push(name.clone());
        current = classes.get(&name).and_then(|c| c.parent.clone());
    }
}

fn register_function(
    func: &FunctionDecl,
    file: &str,
    functions: &mut HashMap<String, FunctionInfo>,
    diagnostics: &mut DiagnosticEngine,
) {
    match functions.get_mut(&func.name) {
        None => {
            functions.insert(func.name.clone(), FunctionInfo { decl: func.clone(), defined: func.body.is_some() });
        }
        Some(existing) => {
            if existing.defined && func.body.is_some() {
                diagnostics.duplicate_declaration("function", &func.name, span_of(file, func.pos));
            } else if func.body.is_some() {
                // A prototype is now replaced by its definition.
                existing.decl = func.clone();
                existing.defined = true;
            }
            // A second prototype after a definition, or after another
            // prototype, is silently ignored (SPEC_FULL §4.3).
        }
    }
}

pub fn span_of(file: &str, pos: slc_ast::Pos) -> Span {
    Span::new(file.to_string(), pos.line, pos.col, 1)
}
