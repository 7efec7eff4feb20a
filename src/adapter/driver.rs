//! Compile driver - the host side of a compile request.
//!
//! Asks the backend where its output goes and which flags to pass, runs the
//! compiler, then lets the backend normalize the result. The backend never
//! touches the process or the filesystem itself.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::adapter::trait_def::{
    CompileRequest, CompileResult, CompilerBackend, OutputLocator, OutputProcessor,
};
use crate::util::process::ProcessBuilder;

/// Base name the driver offers backends for output naming.
pub const OUTPUT_BASE: &str = "output";

/// Runs compile requests against a backend.
pub struct CompileDriver<'a> {
    backend: &'a dyn CompilerBackend,
    processor: &'a dyn OutputProcessor,
    workdir: PathBuf,
}

impl<'a> CompileDriver<'a> {
    /// Create a driver writing into `workdir`.
    pub fn new(
        backend: &'a dyn CompilerBackend,
        processor: &'a dyn OutputProcessor,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        CompileDriver {
            backend,
            processor,
            workdir: workdir.into(),
        }
    }

    /// File the backend will produce, under the working directory as given.
    pub fn output_path(&self) -> PathBuf {
        OutputLocator::new(&self.workdir, OUTPUT_BASE).resolve(self.backend)
    }

    /// Full compiler argument list: backend flags, filter flags, user flags,
    /// then the source file.
    pub fn arguments(&self, request: &CompileRequest, output: &Path) -> Vec<String> {
        let mut args = self
            .backend
            .options_for_backend(&request.backend_options, output);
        args.extend(
            self.backend
                .options_for_filter(&request.filters, output, &request.user_options),
        );
        args.extend(request.user_options.iter().cloned());
        args.push(request.source.display().to_string());
        args
    }

    /// Compile and normalize.
    ///
    /// The compiler runs inside the working directory, so the workdir, the
    /// output path and the source are made absolute first.
    ///
    /// A non-zero compiler exit is not an error: the result carries the code
    /// and diagnostics, and normalization still runs over whatever output
    /// exists.
    pub fn compile(&self, request: &CompileRequest) -> Result<CompileResult> {
        std::fs::create_dir_all(&self.workdir).with_context(|| {
            format!(
                "failed to create working directory: {}",
                self.workdir.display()
            )
        })?;
        let workdir = std::path::absolute(&self.workdir)
            .with_context(|| format!("failed to resolve {}", self.workdir.display()))?;
        let request = CompileRequest {
            source: std::path::absolute(&request.source)
                .with_context(|| format!("failed to resolve {}", request.source.display()))?,
            ..request.clone()
        };

        let output = OutputLocator::new(&workdir, OUTPUT_BASE).resolve(self.backend);
        let pb = ProcessBuilder::new(self.backend.exe())
            .args(self.arguments(&request, &output))
            .cwd(&workdir);

        tracing::info!("compiling with {}: {}", self.backend.key(), pb.display_command());
        if !request.backend_options.is_empty() {
            tracing::debug!(
                "backend options for {}: {:?}",
                self.backend.key(),
                request.backend_options.options
            );
        }
        let out = pb.exec()?;

        let mut result = CompileResult {
            code: out.code,
            stdout: out.stdout,
            stderr: out.stderr,
            output_filename: output.clone(),
            language_id: self
                .backend
                .result_language_id(Some(&request.filters))
                .map(str::to_string),
            ..Default::default()
        };

        if result.success() && output.exists() {
            result.asm = std::fs::read_to_string(&output)
                .with_context(|| format!("failed to read compiler output: {}", output.display()))?;
        } else if result.success() {
            tracing::warn!(
                "{} exited successfully but wrote no {}",
                self.backend.key(),
                output.display()
            );
        }

        self.backend
            .process_output(result, &request.filters, &request.user_options, self.processor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::capabilities::{Filter, FilterSet};
    use crate::adapter::compproj::CompProjBackend;
    use crate::test_support::RecordingProcessor;

    #[test]
    fn test_output_path_from_backend() {
        let backend = CompProjBackend::default();
        let processor = RecordingProcessor::new();
        let driver = CompileDriver::new(&backend, &processor, "/tmp/build1");

        assert_eq!(driver.output_path(), PathBuf::from("/tmp/build1/out.ll"));
    }

    #[test]
    fn test_argument_order() {
        let backend = CompProjBackend::default();
        let processor = RecordingProcessor::new();
        let driver = CompileDriver::new(&backend, &processor, "/tmp/build1");
        let request = CompileRequest::new("main.src")
            .with_filters(FilterSet::from_filters([Filter::Intel, Filter::Labels]))
            .with_user_options(vec!["-O".to_string()]);

        let args = driver.arguments(&request, &driver.output_path());
        assert_eq!(args, vec!["--output", "/tmp/build1/out.ll", "-O", "main.src"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_reads_output_and_discards_filters() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("fake-compiler");
        std::fs::write(
            &script,
            "#!/bin/sh\n[ \"$1\" = \"--output\" ] || exit 2\nprintf 'define i64 @main() {\\n  ret i64 0\\n}\\n' > \"$2\"\necho compiled\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let backend = CompProjBackend::new(&script);
        let processor = RecordingProcessor::new();
        let workdir = tmp.path().join("work");
        let driver = CompileDriver::new(&backend, &processor, &workdir);
        let request = CompileRequest::new("main.src")
            .with_filters(FilterSet::from_filters([Filter::Trim, Filter::CommentOnly]));

        let result = driver.compile(&request).unwrap();

        assert!(result.success());
        assert_eq!(result.stdout, vec!["compiled"]);
        assert_eq!(result.output_filename, workdir.join("out.ll"));
        assert!(result.asm.contains("define i64 @main()"));
        assert_eq!(result.language_id.as_deref(), Some("llvm"));
        assert_eq!(processor.calls(), vec![FilterSet::NONE]);
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_failure_keeps_diagnostics() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("failing-compiler");
        std::fs::write(&script, "#!/bin/sh\necho 'main.src:1:1: unexpected token' >&2\nexit 1\n")
            .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let backend = CompProjBackend::new(&script);
        let processor = RecordingProcessor::new();
        let driver = CompileDriver::new(&backend, &processor, tmp.path().join("work"));

        let result = driver.compile(&CompileRequest::new("main.src")).unwrap();

        assert_eq!(result.code, 1);
        assert!(result.asm.is_empty());
        assert_eq!(result.stderr, vec!["main.src:1:1: unexpected token"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_with_relative_workdir() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("fake-compiler");
        std::fs::write(
            &script,
            "#!/bin/sh\nprintf 'define i64 @main() {\\n  ret i64 0\\n}\\n' > \"$2\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        // A directory under the current one, named relative to it.
        let local = tempfile::Builder::new()
            .prefix("irshim-driver-")
            .tempdir_in(".")
            .unwrap();
        let workdir = Path::new(local.path().file_name().unwrap()).join("work");
        assert!(workdir.is_relative());

        let backend = CompProjBackend::new(&script);
        let processor = RecordingProcessor::new();
        let driver = CompileDriver::new(&backend, &processor, &workdir);

        let result = driver.compile(&CompileRequest::new("main.src")).unwrap();

        assert!(result.success());
        assert!(result.output_filename.is_absolute());
        assert!(result.output_filename.ends_with("work/out.ll"));
        assert!(workdir.join("out.ll").exists());
        assert!(!workdir.join(&workdir).exists());
        assert!(result.asm.contains("define i64 @main()"));
    }

    #[test]
    fn test_spawn_failure_propagates() {
        let backend = CompProjBackend::new("definitely-not-a-real-compiler-xyz");
        let processor = RecordingProcessor::new();
        let tmp = tempfile::tempdir().unwrap();
        let driver = CompileDriver::new(&backend, &processor, tmp.path());

        let err = driver.compile(&CompileRequest::new("main.src")).unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
        assert!(processor.calls().is_empty());
    }
}
