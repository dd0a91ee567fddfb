use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Read WGSL source from disk.
pub fn read_shader_source(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path).map_err(|source| Error::Asset {
        kind: "shader",
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("loaded shader {} ({} bytes)", path.display(), source.len());
    Ok(source)
}

/// Turn the result of a validation error scope around shader and pipeline
/// creation into an error naming the shader file.
pub fn check_shader_scope(path: &Path, scope_error: Option<impl fmt::Display>) -> Result<()> {
    match scope_error {
        Some(err) => Err(Error::Shader {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
        None => Ok(()),
    }
}

pub fn create_shader_module(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_existing_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "@vertex fn vs_main() {{}}").unwrap();
        let source = read_shader_source(file.path()).unwrap();
        assert!(source.contains("vs_main"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shaders/default.wgsl");
        let err = read_shader_source(&path).unwrap_err();
        match &err {
            Error::Asset { kind, path: p, source } => {
                assert_eq!(*kind, "shader");
                assert_eq!(p, &path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("default.wgsl"));
    }

    #[test]
    fn scope_errors_name_the_shader() {
        let path = Path::new("shaders/broken.wgsl");
        assert!(check_shader_scope(path, None::<&str>).is_ok());

        let err = check_shader_scope(path, Some("unknown identifier `colr`")).unwrap_err();
        assert!(matches!(err, Error::Shader { .. }));
        let text = err.to_string();
        assert!(text.contains("broken.wgsl"), "{text}");
        assert!(text.contains("colr"), "{text}");
    }

    #[test]
    fn bundled_shader_validates() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(crate::config::SHADER_PATH);
        let source = read_shader_source(&path).unwrap();
        let module = naga::front::wgsl::parse_str(&source).unwrap();
        naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all())
            .validate(&module)
            .unwrap();

        let entries: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(entries.contains(&"vs_main"));
        assert!(entries.contains(&"fs_main"));
    }

    #[test]
    fn malformed_source_fails_to_parse() {
        assert!(naga::front::wgsl::parse_str("@fragment fn fs_main( -> {").is_err());
    }

    #[test]
    fn bundled_shader_is_present() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(crate::config::SHADER_PATH);
        let source = read_shader_source(&path).unwrap();
        for entry in ["vs_main", "fs_main", "u_texture_0", "light"] {
            assert!(source.contains(entry), "shader lacks {entry}");
        }
    }
}
