//! Structured form of a generated shader module.
//!
//! Section-writers never emit text directly. They push declarations, value
//! bindings and output writes into a [`Stage`], and [`Program::render`] lays
//! the sections out in a fixed order: standard IO, parameters, attributes,
//! then `with` bindings, then `as` writes. Because the order lives here and
//! not in the writers, no combination of branches can put a binding before a
//! declaration.

use std::fmt::Write as _;

/// Banner written at the top of every generated module.
pub const GENERATED_BANNER: &str = "-- Generated by shadergen. Do not edit.";

const VERTEX_NAME: &str = "v";
const FRAGMENT_NAME: &str = "f";
const PROGRAM_NAME: &str = "p";

/// Package and module-name prefix shared by every module of one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNaming {
    pub package: String,
    pub prefix: String,
}

impl ModuleNaming {
    pub fn new(package: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            prefix: prefix.into(),
        }
    }

    pub fn module_name(&self, code: &str) -> String {
        format!("{}_{}", self.prefix, code)
    }

    pub fn module_path(&self, code: &str) -> String {
        format!("{}.{}", self.package, self.module_name(code))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    fn keyword(self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
        }
    }

    fn name(self) -> &'static str {
        match self {
            StageKind::Vertex => VERTEX_NAME,
            StageKind::Fragment => FRAGMENT_NAME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Input { name: &'static str, ty: &'static str },
    Output { name: &'static str, ty: &'static str },
    /// The vertex stage's clip-space position output.
    Position { name: &'static str },
    /// A fragment colour target bound to an output index.
    Target { name: &'static str, index: u32 },
    Parameter { name: &'static str, ty: &'static str },
}

impl Declaration {
    pub fn input(name: &'static str, ty: &'static str) -> Self {
        Declaration::Input { name, ty }
    }

    pub fn output(name: &'static str, ty: &'static str) -> Self {
        Declaration::Output { name, ty }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Declaration::Input { name, .. }
            | Declaration::Output { name, .. }
            | Declaration::Position { name }
            | Declaration::Target { name, .. }
            | Declaration::Parameter { name, .. } => name,
        }
    }

    fn render(&self, out: &mut String) {
        let _ = match self {
            Declaration::Input { name, ty } => writeln!(out, "    in {name} : {ty};"),
            Declaration::Output { name, ty } => writeln!(out, "    out {name} : {ty};"),
            Declaration::Position { name } => {
                writeln!(out, "    out vertex {name} : vector_4f;")
            }
            Declaration::Target { name, index } => {
                writeln!(out, "    out {name} : vector_4f as {index};")
            }
            Declaration::Parameter { name, ty } => writeln!(out, "    parameter {name} : {ty};"),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: &'static str,
    pub expr: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    Output { name: &'static str, expr: String },
    Discard { condition: String },
}

impl Write {
    fn expr(&self) -> &str {
        match self {
            Write::Output { expr, .. } => expr,
            Write::Discard { condition } => condition,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    kind: StageKind,
    io: Vec<Declaration>,
    parameters: Vec<Declaration>,
    attributes: Vec<Declaration>,
    values: Vec<Binding>,
    writes: Vec<Write>,
}

impl Stage {
    pub fn new(kind: StageKind) -> Self {
        Self {
            kind,
            io: Vec::new(),
            parameters: Vec::new(),
            attributes: Vec::new(),
            values: Vec::new(),
            writes: Vec::new(),
        }
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// Declarations every program of a family carries, independent of features.
    pub fn standard(&mut self, declaration: Declaration) {
        self.io.push(declaration);
    }

    pub fn parameter(&mut self, name: &'static str, ty: &'static str) {
        self.parameters.push(Declaration::Parameter { name, ty });
    }

    pub fn attribute(&mut self, declaration: Declaration) {
        self.attributes.push(declaration);
    }

    pub fn value(&mut self, name: &'static str, expr: impl Into<String>) {
        self.values.push(Binding {
            name,
            expr: expr.into(),
        });
    }

    pub fn write(&mut self, name: &'static str, expr: impl Into<String>) {
        self.writes.push(Write::Output {
            name,
            expr: expr.into(),
        });
    }

    pub fn discard(&mut self, condition: impl Into<String>) {
        self.writes.push(Write::Discard {
            condition: condition.into(),
        });
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.io
            .iter()
            .chain(self.parameters.iter())
            .chain(self.attributes.iter())
    }

    pub fn values(&self) -> &[Binding] {
        &self.values
    }

    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    pub fn declares(&self, name: &str) -> bool {
        self.declarations().any(|decl| decl.name() == name)
    }

    pub fn binds(&self, name: &str) -> bool {
        self.values.iter().any(|binding| binding.name == name)
    }

    /// True when any binding or write mentions `ident` as a whole identifier.
    pub fn references(&self, ident: &str) -> bool {
        self.values
            .iter()
            .map(|binding| binding.expr.as_str())
            .chain(self.writes.iter().map(Write::expr))
            .any(|expr| mentions(expr, ident))
    }

    fn render(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "  shader {} {} is",
            self.kind.keyword(),
            self.kind.name()
        );
        for declaration in self.declarations() {
            declaration.render(out);
        }
        out.push_str("  with\n");
        for binding in &self.values {
            render_binding(binding, out);
        }
        out.push_str("  as\n");
        for write in &self.writes {
            let _ = match write {
                Write::Output { name, expr } => writeln!(out, "    out {name} = {expr};"),
                Write::Discard { condition } => writeln!(out, "    discard ({condition});"),
            };
        }
        out.push_str("  end;\n");
    }
}

fn render_binding(binding: &Binding, out: &mut String) {
    if binding.expr.contains('\n') {
        let _ = writeln!(out, "    value {} =", binding.name);
        let mut lines = binding.expr.lines().peekable();
        while let Some(line) = lines.next() {
            out.push_str("      ");
            out.push_str(line);
            if lines.peek().is_none() {
                out.push(';');
            }
            out.push('\n');
        }
    } else {
        let _ = writeln!(out, "    value {} = {};", binding.name, binding.expr);
    }
}

fn mentions(expr: &str, ident: &str) -> bool {
    let is_ident = |ch: char| ch.is_ascii_alphanumeric() || ch == '_';
    expr.match_indices(ident).any(|(start, _)| {
        let before = expr[..start].chars().next_back();
        let after = expr[start + ident.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

/// A complete vertex/fragment module ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    package: String,
    module: String,
    imports: &'static [&'static str],
    vertex: Stage,
    fragment: Stage,
}

impl Program {
    pub fn new(
        naming: &ModuleNaming,
        code: &str,
        imports: &'static [&'static str],
        vertex: Stage,
        fragment: Stage,
    ) -> Self {
        Self {
            package: naming.package.clone(),
            module: naming.module_name(code),
            imports,
            vertex,
            fragment,
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module
    }

    /// Fully qualified module name, as listed in the batch manifest.
    pub fn module_path(&self) -> String {
        format!("{}.{}", self.package, self.module)
    }

    pub fn vertex(&self) -> &Stage {
        &self.vertex
    }

    pub fn fragment(&self) -> &Stage {
        &self.fragment
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(GENERATED_BANNER);
        out.push_str("\n\n");
        let _ = writeln!(out, "package {};", self.package);
        out.push('\n');
        let _ = writeln!(out, "module {} is", self.module);
        out.push('\n');
        for import in self.imports {
            let _ = writeln!(out, "  import {import};");
        }
        out.push('\n');
        self.vertex.render(&mut out);
        out.push('\n');
        self.fragment.render(&mut out);
        out.push('\n');
        let _ = writeln!(out, "  shader program {PROGRAM_NAME} is");
        let _ = writeln!(out, "    vertex {VERTEX_NAME};");
        let _ = writeln!(out, "    fragment {FRAGMENT_NAME};");
        out.push_str("  end;\n");
        out.push('\n');
        out.push_str("end;\n");
        out
    }
}

/// Returns the rendered text of one stage, from its `shader` line to its
/// closing `end;`.
pub fn stage_block(text: &str, kind: StageKind) -> Option<&str> {
    let header = format!("  shader {} {} is\n", kind.keyword(), kind.name());
    let start = text.find(&header)?;
    let rest = &text[start..];
    let end = rest.find("\n  end;\n")?;
    Some(&rest[..end + "\n  end;\n".len()])
}

/// Checks that a rendered stage keeps declarations before `with`, bindings
/// between `with` and `as`, and writes after `as`. Returns one message per
/// misplaced line.
pub fn section_order_violations(stage: &str) -> Vec<String> {
    #[derive(PartialEq)]
    enum Section {
        Declarations,
        Values,
        Writes,
    }

    let mut section = Section::Declarations;
    let mut violations = Vec::new();
    for line in stage.lines().skip(1) {
        let trimmed = line.trim();
        match trimmed {
            "with" => {
                if section != Section::Declarations {
                    violations.push("'with' appears out of order".to_string());
                }
                section = Section::Values;
                continue;
            }
            "as" => {
                if section != Section::Values {
                    violations.push("'as' appears before 'with'".to_string());
                }
                section = Section::Writes;
                continue;
            }
            "end;" => break,
            _ => {}
        }
        if !line.starts_with("    ") || line.starts_with("      ") {
            continue;
        }
        let expected = if trimmed.starts_with("parameter ")
            || ((trimmed.starts_with("in ") || trimmed.starts_with("out "))
                && trimmed.contains(" : "))
        {
            Section::Declarations
        } else if trimmed.starts_with("value ") {
            Section::Values
        } else {
            Section::Writes
        };
        if expected != section {
            violations.push(format!("misplaced line: {trimmed}"));
        }
    }
    if section != Section::Writes {
        violations.push("stage never reached its write section".to_string());
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_program() -> Program {
        let mut vertex = Stage::new(StageKind::Vertex);
        vertex.value("position_clip", "v_position");
        vertex.standard(Declaration::input("v_position", "vector_4f"));
        vertex.write("f_position_clip", "position_clip");
        vertex.standard(Declaration::Position {
            name: "f_position_clip",
        });

        let mut fragment = Stage::new(StageKind::Fragment);
        fragment.standard(Declaration::Target {
            name: "out_0",
            index: 0,
        });
        fragment.value("rgba", "record Colour {\n  r = 1.0\n}");
        fragment.parameter("p_colour", "vector_4f");
        fragment.discard("F.lesser (rgba [w], 0.5)");
        fragment.write("out_0", "rgba");

        Program::new(
            &ModuleNaming::new("shaders.test", "Tst"),
            "A_B",
            &["core.Float as F"],
            vertex,
            fragment,
        )
    }

    #[test]
    fn renders_sections_in_fixed_order_regardless_of_push_order() {
        let text = sample_program().render();
        for kind in [StageKind::Vertex, StageKind::Fragment] {
            let block = stage_block(&text, kind).expect("stage present");
            assert!(section_order_violations(block).is_empty(), "{block}");
        }
        let vertex = stage_block(&text, StageKind::Vertex).unwrap();
        assert!(vertex.find("in v_position").unwrap() < vertex.find("with").unwrap());
    }

    #[test]
    fn renders_module_skeleton() {
        let program = sample_program();
        let text = program.render();
        assert!(text.starts_with(GENERATED_BANNER));
        assert!(text.contains("package shaders.test;\n"));
        assert!(text.contains("module Tst_A_B is\n"));
        assert!(text.contains("  import core.Float as F;\n"));
        assert!(text.contains("    out vertex f_position_clip : vector_4f;\n"));
        assert!(text.contains("    out out_0 : vector_4f as 0;\n"));
        assert!(text.contains("    discard (F.lesser (rgba [w], 0.5));\n"));
        assert!(text.contains("    value rgba =\n      record Colour {\n        r = 1.0\n      };\n"));
        assert!(text.contains("  shader program p is\n    vertex v;\n    fragment f;\n  end;\n"));
        assert!(text.ends_with("end;\n"));
        assert_eq!(program.module_path(), "shaders.test.Tst_A_B");
    }

    #[test]
    fn detects_misplaced_lines() {
        let stage = "  shader vertex v is\n    value x = y;\n  with\n    in v_uv : vector_2f;\n  as\n    out f = x;\n  end;\n";
        let violations = section_order_violations(stage);
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn references_match_whole_identifiers() {
        let mut stage = Stage::new(StageKind::Fragment);
        stage.value("albedo", "S2.texture (t_albedo, f_uv_scaled)");
        assert!(!stage.references("f_uv"));
        assert!(stage.references("t_albedo"));
        stage.value("emission", "S2.texture (t_emission, f_uv) [x]");
        assert!(stage.references("f_uv"));
    }

    #[test]
    fn module_naming_joins_prefix_and_code() {
        let naming = ModuleNaming::new("shaders.forward", "Fwd");
        assert_eq!(naming.module_name("LD_BT_O"), "Fwd_LD_BT_O");
        assert_eq!(naming.module_path("LD_BT_O"), "shaders.forward.Fwd_LD_BT_O");
    }
}
