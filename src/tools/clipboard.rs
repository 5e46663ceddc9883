use anyhow::{Context, Result, bail};
use log::debug;
use std::io::Write;
use std::process::{Command, Stdio};

/// 能把文字放進剪貼簿的工具
pub trait CopyTool: Send + Sync {
    fn name(&self) -> &str;

    fn try_copy_text(&self, text: &str) -> Result<()>;
}

/// 透過外部指令（pbcopy、xclip 等）寫入剪貼簿
///
/// stdout/stderr 不接管：xclip 會留下背景程序持有繼承的輸出，只等待指令本身結束
#[derive(Debug, Clone)]
pub struct CommandCopyTool {
    program: String,
    args: Vec<String>,
}

impl CommandCopyTool {
    #[must_use]
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
        }
    }
}

impl CopyTool for CommandCopyTool {
    fn name(&self) -> &str {
        &self.program
    }

    fn try_copy_text(&self, text: &str) -> Result<()> {
        let program = &self.program;
        let mut child = Command::new(program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {program}"))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .with_context(|| format!("Failed to write to {program}"))?;
        }

        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for {program}"))?;

        if !status.success() {
            bail!("{program} exited with {status}");
        }

        Ok(())
    }
}

/// 系統剪貼簿：依平台優先順序逐一嘗試各工具
pub struct SystemClipboard {
    tools: Vec<CommandCopyTool>,
}

impl SystemClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: platform_tools(),
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl CopyTool for SystemClipboard {
    fn name(&self) -> &str {
        "system clipboard"
    }

    /// 全部失敗時回傳最後的錯誤
    fn try_copy_text(&self, text: &str) -> Result<()> {
        let mut last_error = None;

        for tool in &self.tools {
            match tool.try_copy_text(text) {
                Ok(()) => {
                    debug!("Copied {} bytes to clipboard via {}", text.len(), tool.name());
                    return Ok(());
                }
                Err(e) => {
                    debug!("Clipboard tool {} failed: {e:#}", tool.name());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("No clipboard tool available")))
    }
}

#[cfg(target_os = "macos")]
fn platform_tools() -> Vec<CommandCopyTool> {
    vec![CommandCopyTool::new("pbcopy", &[])]
}

#[cfg(target_os = "windows")]
fn platform_tools() -> Vec<CommandCopyTool> {
    vec![CommandCopyTool::new("clip", &[])]
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_tools() -> Vec<CommandCopyTool> {
    vec![
        CommandCopyTool::new("wl-copy", &[]),
        CommandCopyTool::new("xclip", &["-selection", "clipboard"]),
        CommandCopyTool::new("xsel", &["--clipboard", "--input"]),
    ]
}
