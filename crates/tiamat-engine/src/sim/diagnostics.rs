use state::InitCell;

/// Severity of one shader compilation message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// One message produced while compiling deployment-supplied WGSL.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub severity: DiagnosticSeverity,
    /// 1-based source line, when the compiler attributed one.
    pub line: Option<u32>,
    /// 1-based position within the line, when attributed.
    pub column: Option<u32>,
    pub text: String,
}

/// Compilation diagnostics for one shader, paired with the source text that
/// produced them so a consumer can render annotated listings.
#[derive(Debug, Clone)]
pub struct ShaderDiagnostic {
    /// Label of the shader module ("particle update kernel" / "particle draw shader").
    pub shader: &'static str,
    pub messages: Vec<DiagnosticMessage>,
    pub source: String,
}

impl ShaderDiagnostic {
    /// True if any message is error severity.
    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.severity == DiagnosticSeverity::Error)
    }

    pub(crate) fn from_wgpu(
        shader: &'static str,
        source: &str,
        info: &wgpu::CompilationInfo,
    ) -> Option<Self> {
        if info.messages.is_empty() {
            return None;
        }

        let messages = info
            .messages
            .iter()
            .map(|m| DiagnosticMessage {
                severity: match m.message_type {
                    wgpu::CompilationMessageType::Error => DiagnosticSeverity::Error,
                    wgpu::CompilationMessageType::Warning => DiagnosticSeverity::Warning,
                    wgpu::CompilationMessageType::Info => DiagnosticSeverity::Info,
                },
                line: m.location.as_ref().map(|l| l.line_number),
                column: m.location.as_ref().map(|l| l.line_position),
                text: m.message.clone(),
            })
            .collect();

        Some(Self { shader, messages, source: source.to_string() })
    }
}

type Sink = Box<dyn Fn(&ShaderDiagnostic) + Send + Sync>;

static SINK: InitCell<Sink> = InitCell::new();

/// Installs the process-wide diagnostics hook.
///
/// The first installation wins and stays for the life of the process;
/// returns `false` if a sink was already installed. With no sink installed,
/// diagnostics go to the `log` facade instead.
pub fn set_diagnostics_sink<F>(sink: F) -> bool
where
    F: Fn(&ShaderDiagnostic) + Send + Sync + 'static,
{
    SINK.set(Box::new(sink))
}

/// Routes one shader's diagnostics to the installed sink, or logs them.
pub(crate) fn report(diag: &ShaderDiagnostic) {
    if let Some(sink) = SINK.try_get() {
        sink(diag);
        return;
    }

    for msg in &diag.messages {
        let line = msg.line.map(|l| format!(" at line {l}")).unwrap_or_default();
        match msg.severity {
            DiagnosticSeverity::Error => {
                log::error!("{}{}: {}", diag.shader, line, msg.text)
            }
            DiagnosticSeverity::Warning => {
                log::warn!("{}{}: {}", diag.shader, line, msg.text)
            }
            DiagnosticSeverity::Info => {
                log::debug!("{}{}: {}", diag.shader, line, msg.text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(severity: DiagnosticSeverity) -> DiagnosticMessage {
        DiagnosticMessage { severity, line: Some(3), column: Some(1), text: "boom".into() }
    }

    #[test]
    fn only_error_severity_counts_as_an_error() {
        let noisy = ShaderDiagnostic {
            shader: "kernel",
            messages: vec![msg(DiagnosticSeverity::Warning), msg(DiagnosticSeverity::Info)],
            source: String::new(),
        };
        assert!(!noisy.has_errors());

        let broken = ShaderDiagnostic {
            shader: "kernel",
            messages: vec![msg(DiagnosticSeverity::Warning), msg(DiagnosticSeverity::Error)],
            source: String::new(),
        };
        assert!(broken.has_errors());
    }
}
