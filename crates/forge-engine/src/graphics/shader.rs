use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShaderError {
    #[error("shader function `{0}` not found in source")]
    FunctionNotFound(String),

    #[error("shader source is empty")]
    EmptySource,

    #[error("shader handle is stale or was never issued")]
    InvalidHandle,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
        };
        f.write_str(s)
    }
}

/// One pipeline stage and the source function that implements it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderElement {
    pub stage: ShaderStage,
    pub entry_point: String,
}

impl ShaderElement {
    pub fn new(stage: ShaderStage, entry_point: impl Into<String>) -> Self {
        Self {
            stage,
            entry_point: entry_point.into(),
        }
    }
}

/// The stages a shader is expected to provide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderLayout {
    pub elements: Vec<ShaderElement>,
}

impl ShaderLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, stage: ShaderStage, entry_point: impl Into<String>) -> Self {
        self.elements.push(ShaderElement::new(stage, entry_point));
        self
    }

    /// Vertex + fragment pair for a render pipeline.
    pub fn render(vertex: &str, fragment: &str) -> Self {
        Self::new()
            .with(ShaderStage::Vertex, vertex)
            .with(ShaderStage::Fragment, fragment)
    }
}

/// CPU-side shader resource: WGSL source plus resolved stage entry points.
///
/// Compilation into a `wgpu::ShaderModule` happens in the renderer, which
/// caches modules per handle.
#[derive(Debug, Clone)]
pub struct Shader {
    label: String,
    source: Arc<str>,
    entry_points: HashMap<ShaderStage, String>,
}

impl Shader {
    /// Validates that every entry point named by `layout` is declared in `source`.
    pub fn from_wgsl(
        label: impl Into<String>,
        source: impl Into<Arc<str>>,
        layout: &ShaderLayout,
    ) -> Result<Self, ShaderError> {
        let source: Arc<str> = source.into();
        if source.trim().is_empty() {
            return Err(ShaderError::EmptySource);
        }

        let mut shader = Self {
            label: label.into(),
            source,
            entry_points: HashMap::new(),
        };
        for element in &layout.elements {
            shader.add_function(element.stage, &element.entry_point)?;
        }
        Ok(shader)
    }

    /// Binds `name` as the entry point for `stage`, replacing any previous one.
    pub fn add_function(&mut self, stage: ShaderStage, name: &str) -> Result<(), ShaderError> {
        if !declares_function(&self.source, name) {
            return Err(ShaderError::FunctionNotFound(name.to_string()));
        }
        self.entry_points.insert(stage, name.to_string());
        Ok(())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn entry_point(&self, stage: ShaderStage) -> Option<&str> {
        self.entry_points.get(&stage).map(String::as_str)
    }
}

/// Looks for `fn <name>(` with `name` as a whole identifier.
fn declares_function(source: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let mut rest = source;
    while let Some(pos) = rest.find("fn ") {
        let before_ok = pos == 0
            || !rest[..pos]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '_');
        let after = rest[pos + 3..].trim_start();
        if before_ok
            && let Some(tail) = after.strip_prefix(name)
            && tail.trim_start().starts_with('(')
        {
            return true;
        }
        rest = &rest[pos + 3..];
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = r#"
        @vertex
        fn vs_main(@builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
            return vec4<f32>(0.0);
        }

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0);
        }
    "#;

    #[test]
    fn resolves_declared_entry_points() {
        let shader = Shader::from_wgsl("basic", SRC, &ShaderLayout::render("vs_main", "fs_main"))
            .unwrap();
        assert_eq!(shader.label(), "basic");
        assert_eq!(shader.entry_point(ShaderStage::Vertex), Some("vs_main"));
        assert_eq!(shader.entry_point(ShaderStage::Fragment), Some("fs_main"));
        assert_eq!(shader.entry_point(ShaderStage::Compute), None);
    }

    #[test]
    fn missing_function_is_reported_by_name() {
        let err = Shader::from_wgsl("basic", SRC, &ShaderLayout::render("vs_main", "fs_other"))
            .unwrap_err();
        assert_eq!(err, ShaderError::FunctionNotFound("fs_other".into()));
    }

    #[test]
    fn prefix_of_a_function_name_does_not_match() {
        assert!(!declares_function(SRC, "vs_ma"));
        assert!(!declares_function(SRC, "main"));
        assert!(declares_function(SRC, "fs_main"));
    }

    #[test]
    fn identifiers_ending_in_fn_are_ignored() {
        let src = "let myfn vs_main(x) = 1;";
        assert!(!declares_function(src, "vs_main"));
    }

    #[test]
    fn empty_source_rejected() {
        let err = Shader::from_wgsl("empty", "  \n", &ShaderLayout::new()).unwrap_err();
        assert_eq!(err, ShaderError::EmptySource);
    }

    #[test]
    fn add_function_rebinds_stage() {
        let src = "fn a() {} fn b() {}";
        let mut shader =
            Shader::from_wgsl("cs", src, &ShaderLayout::new().with(ShaderStage::Compute, "a"))
                .unwrap();
        shader.add_function(ShaderStage::Compute, "b").unwrap();
        assert_eq!(shader.entry_point(ShaderStage::Compute), Some("b"));
        assert!(shader.add_function(ShaderStage::Compute, "c").is_err());
        assert_eq!(shader.entry_point(ShaderStage::Compute), Some("b"));
    }
}
