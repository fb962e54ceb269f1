//! Interactive console loop.
//!
//! Reads commands line by line, applies them to the shell and forms, and
//! re-renders after every state change. The status banner deadline is one of
//! the loop's wake-up sources, so an expired message disappears without any
//! input.

use std::future::Future;
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::time::Instant;

use crate::client::{OpenApiSpec, ToolApi};
use crate::console::forms::{OpenApiToolForm, PythonToolForm};
use crate::console::render::render_screen;
use crate::console::shell::{Tab, ToolShell, OPENAPI_TOOL_ADDED, PYTHON_TOOL_ADDED};
use crate::console::status::StatusMessage;
use crate::types::{ConsoleConfig, Result};

/// Terminator for multi-line input.
pub const END_OF_BLOCK: &str = ".";

pub const HELP_TEXT: &str = "\
Commands:
  tab list|python|openapi   switch view (also: list, python, openapi)
  refresh                   refetch the tool list
  delete NAME               delete a tool
  show                      redraw the screen
  help                      this text
  quit                      leave the console
Python tab:
  name NAME                 set the function name
  code                      enter source, end with a line containing a single '.'
  load PATH                 read source from a file
  submit                    register the tool
OpenAPI tab:
  op [ID]                   set or clear the operation id
  spec                      enter the JSON document, end with a line containing a single '.'
  load PATH                 read the document from a file
  submit                    register the tool
";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Quit,
    Tab(Tab),
    Refresh,
    Delete(String),
    Name(String),
    Code,
    Op(Option<String>),
    Spec,
    Load(PathBuf),
    Submit,
}

impl Command {
    /// Parse one input line. `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let cmd = match word.to_ascii_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "show" => Command::Show,
            "quit" | "exit" => Command::Quit,
            "refresh" => Command::Refresh,
            "submit" => Command::Submit,
            "code" => Command::Code,
            "spec" => Command::Spec,
            "tab" => match Tab::from_name(rest) {
                Some(tab) => Command::Tab(tab),
                None => return Err(format!("unknown tab '{}'", rest)),
            },
            "list" | "python" | "openapi" => match Tab::from_name(word) {
                Some(tab) => Command::Tab(tab),
                None => return Err(format!("unknown tab '{}'", word)),
            },
            "delete" | "rm" => {
                if rest.is_empty() {
                    return Err("usage: delete NAME".to_string());
                }
                Command::Delete(rest.to_string())
            }
            "name" => {
                if rest.is_empty() {
                    return Err("usage: name NAME".to_string());
                }
                Command::Name(rest.to_string())
            }
            "op" => Command::Op(Some(rest.to_string()).filter(|s| !s.is_empty())),
            "load" => {
                if rest.is_empty() {
                    return Err("usage: load PATH".to_string());
                }
                Command::Load(PathBuf::from(rest))
            }
            other => return Err(format!("unknown command '{}', try `help`", other)),
        };
        Ok(Some(cmd))
    }
}

/// The interactive console: shell plus the two forms.
#[derive(Debug)]
pub struct Console<A> {
    shell: ToolShell<A>,
    python: PythonToolForm,
    openapi: OpenApiToolForm,
    prompt: String,
}

impl<A: ToolApi> Console<A> {
    pub fn new(api: A, config: &ConsoleConfig) -> Self {
        Self {
            shell: ToolShell::new(api, config),
            python: PythonToolForm::default(),
            openapi: OpenApiToolForm::default(),
            prompt: config.prompt.clone(),
        }
    }

    pub fn shell(&self) -> &ToolShell<A> {
        &self.shell
    }

    pub fn python_form(&self) -> &PythonToolForm {
        &self.python
    }

    pub fn openapi_form(&self) -> &OpenApiToolForm {
        &self.openapi
    }

    /// Mount, then process input until EOF or `quit`.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        // A failed first fetch is already on the banner
        let _ = self.shell.mount().await;
        self.redraw(&mut output).await?;

        let mut lines = input.lines();
        loop {
            let deadline = self.shell.status_deadline();
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        tracing::debug!("console input closed");
                        break;
                    };
                    self.shell.expire_status();
                    match Command::parse(&line) {
                        Ok(None) => {
                            self.write_prompt(&mut output).await?;
                            continue;
                        }
                        Ok(Some(Command::Quit)) => break,
                        Ok(Some(Command::Help)) => {
                            output.write_all(HELP_TEXT.as_bytes()).await?;
                            self.write_prompt(&mut output).await?;
                            continue;
                        }
                        Ok(Some(cmd)) => self.apply(cmd, &mut lines, &mut output).await?,
                        Err(msg) => self.shell.notify(StatusMessage::error(msg)),
                    }
                    self.redraw(&mut output).await?;
                }
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if self.shell.expire_status() {
                        self.redraw(&mut output).await?;
                    }
                }
            }
        }

        output.flush().await?;
        Ok(())
    }

    /// Apply one command. Failures land on the banner; only I/O on the
    /// console streams is returned as an error. `output` receives interim
    /// screens while a backend call is outstanding.
    pub async fn apply<R, W>(
        &mut self,
        cmd: Command,
        lines: &mut Lines<R>,
        output: &mut W,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::debug!(?cmd, tab = ?self.shell.tab(), "console command");
        match cmd {
            Command::Help | Command::Show | Command::Quit => {}
            Command::Tab(tab) => self.shell.select_tab(tab),
            Command::Refresh => self.refresh(output).await?,
            Command::Delete(name) => {
                let result = self.pending(self.shell.api().delete_tool(&name), output).await?;
                if self.shell.apply_delete(result).is_ok() {
                    self.refresh(output).await?;
                }
            }
            Command::Name(name) => {
                if self.require_tab(Tab::AddPython, "name") {
                    self.python.function_name = name;
                }
            }
            Command::Op(op) => {
                if self.require_tab(Tab::AddOpenApi, "op") {
                    self.openapi.operation_id = op.unwrap_or_default();
                }
            }
            Command::Code => {
                if self.require_tab(Tab::AddPython, "code") {
                    self.python.function_code = read_block(lines).await?;
                }
            }
            Command::Spec => {
                if self.require_tab(Tab::AddOpenApi, "spec") {
                    self.openapi.spec_text = read_block(lines).await?;
                }
            }
            Command::Load(path) => self.load(path).await,
            Command::Submit => match self.shell.tab() {
                Tab::AddPython => {
                    let Ok(submission) = self.python.begin_submit() else {
                        return Ok(());
                    };
                    let call = self
                        .shell
                        .api()
                        .add_python_tool(&submission.function_code, &submission.function_name);
                    let result = self.pending(call, output).await?;
                    let result = self.shell.apply_add(result, PYTHON_TOOL_ADDED);
                    self.python.finish_submit(&result);
                    if result.is_ok() {
                        self.refresh(output).await?;
                    }
                }
                Tab::AddOpenApi => {
                    let Ok(submission) = self.openapi.begin_submit() else {
                        return Ok(());
                    };
                    let call = self.shell.api().add_openapi_tool(
                        OpenApiSpec::Document(submission.spec),
                        submission.operation_id,
                    );
                    let result = self.pending(call, output).await?;
                    let result = self.shell.apply_add(result, OPENAPI_TOOL_ADDED);
                    self.openapi.finish_submit(&result);
                    if result.is_ok() {
                        self.refresh(output).await?;
                    }
                }
                Tab::List => self
                    .shell
                    .notify(StatusMessage::error("nothing to submit on the list tab")),
            },
        }
        Ok(())
    }

    async fn refresh<W: AsyncWrite + Unpin>(&mut self, output: &mut W) -> Result<()> {
        let result = self.pending(self.shell.api().list_tools(), output).await?;
        let _ = self.shell.apply_fetch(result);
        Ok(())
    }

    /// Await a backend call. If the banner deadline passes first, the screen
    /// is redrawn without the message while the call is still outstanding.
    async fn pending<T, F, W>(&self, call: F, output: &mut W) -> Result<T>
    where
        F: Future<Output = T>,
        W: AsyncWrite + Unpin,
    {
        tokio::pin!(call);
        let mut deadline = self.shell.status_deadline();
        loop {
            tokio::select! {
                value = &mut call => return Ok(value),
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    deadline = None;
                    self.redraw(output).await?;
                }
            }
        }
    }

    async fn load(&mut self, path: PathBuf) {
        let tab = self.shell.tab();
        if tab == Tab::List {
            self.shell
                .notify(StatusMessage::error("`load` works on the python and openapi tabs"));
            return;
        }

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                if tab == Tab::AddPython {
                    self.python.function_code = text;
                } else {
                    self.openapi.spec_text = text;
                }
                self.shell.notify(StatusMessage::success(format!(
                    "Loaded {}",
                    path.display()
                )));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "load failed");
                self.shell.notify(StatusMessage::error(format!(
                    "Error reading {}: {}",
                    path.display(),
                    e
                )));
            }
        }
    }

    fn require_tab(&mut self, tab: Tab, cmd: &str) -> bool {
        if self.shell.tab() == tab {
            return true;
        }
        self.shell.notify(StatusMessage::error(format!(
            "`{}` is only available on the {} tab",
            cmd,
            tab.label()
        )));
        false
    }

    async fn redraw<W: AsyncWrite + Unpin>(&self, output: &mut W) -> Result<()> {
        let screen = render_screen(&self.shell, &self.python, &self.openapi);
        output.write_all(b"\n").await?;
        output.write_all(screen.as_bytes()).await?;
        self.write_prompt(output).await
    }

    async fn write_prompt<W: AsyncWrite + Unpin>(&self, output: &mut W) -> Result<()> {
        output.write_all(self.prompt.as_bytes()).await?;
        output.flush().await?;
        Ok(())
    }
}

/// Collect lines up to a lone `.` (or EOF).
async fn read_block<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> Result<String> {
    let mut collected = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim_end() == END_OF_BLOCK {
            break;
        }
        collected.push(line);
    }
    Ok(collected.join("\n"))
}
