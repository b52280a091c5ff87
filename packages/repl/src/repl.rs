//! The shell core: one loop driving dispatcher, renderer and prompt.

use std::sync::Arc;

use cosmos_client::DocumentClient;

use crate::commands::{self, CommandResult};
use crate::context::ShellContext;
use crate::io::{ExitReason, IoError, IoHost, Output, PromptConfig, Signal};
use crate::render::{Destination, OutputRenderer};
use crate::session::ColorMode;

const BANNER: &str = "Connected to CosmosDB";

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// The host-independent shell core.
pub struct ReplCore {
    ctx: ShellContext,
    renderer: OutputRenderer,
}

impl ReplCore {
    pub fn new(client: Arc<dyn DocumentClient>, color_mode: ColorMode) -> Self {
        Self {
            ctx: ShellContext::new(client, color_mode),
            renderer: OutputRenderer::new(),
        }
    }

    pub fn context(&self) -> &ShellContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut ShellContext {
        &mut self.ctx
    }

    /// Apply `-d`/`-c` invocation flags before the loop or batch starts.
    pub fn preselect(
        &mut self,
        database: Option<&str>,
        collection: Option<&str>,
        io: &mut impl IoHost,
    ) -> Result<(), IoError> {
        if let Some(name) = database {
            if let Some(warning) = self.ctx.select_database(name) {
                io.write_output(Output::feedback(warning))?;
            }
        }
        if let Some(name) = collection {
            self.ctx.select_collection(name);
        }
        Ok(())
    }

    /// Run the interactive loop until exit or end-of-input.
    pub fn run(&mut self, io: &mut impl IoHost) -> Result<ExitReason, IoError> {
        io.write_output(Output::banner(BANNER))?;

        loop {
            self.update_prompt(io)?;
            io.wait_for_input()?;

            if let Some(signal) = io.read_signal()? {
                match signal {
                    Signal::Eof => {
                        io.flush()?;
                        return Ok(ExitReason::Eof);
                    }
                    // Ctrl+C at an idle prompt means leave; mid-line it
                    // only discards what was typed.
                    Signal::Interrupt { line_empty: true } => {
                        io.flush()?;
                        return Ok(ExitReason::Interrupted);
                    }
                    Signal::Interrupt { line_empty: false } => {
                        io.write_output(Output::feedback("^C"))?;
                        continue;
                    }
                }
            }

            let input = match io.read_input()? {
                Some(input) => input,
                None => continue,
            };

            if self.dispatch(&input.line, io, true)? == Flow::Exit {
                io.flush()?;
                return Ok(ExitReason::UserExit);
            }

            io.flush()?;
        }
    }

    /// Execute a fixed list of command strings in order, then return. Batch
    /// runs never page: the user is not at the other end of a pager.
    pub fn run_batch(&mut self, lines: &[String], io: &mut impl IoHost) -> Result<(), IoError> {
        for line in lines {
            if self.dispatch(line, io, false)? == Flow::Exit {
                break;
            }
            io.flush()?;
        }
        Ok(())
    }

    fn dispatch(
        &mut self,
        line: &str,
        io: &mut impl IoHost,
        interactive: bool,
    ) -> Result<Flow, IoError> {
        match commands::execute(line, &mut self.ctx) {
            CommandResult::Ok { display: None } => {}
            CommandResult::Ok {
                display: Some(text),
            } => {
                io.write_output(Output::normal(text))?;
            }
            CommandResult::Feedback(text) => {
                io.write_output(Output::feedback(text))?;
            }
            CommandResult::Error(text) => {
                io.write_output(Output::error(text))?;
            }
            CommandResult::Payload(mut request) => {
                request.destination = effective_destination(request.destination, interactive);
                if let Err(e) = self.renderer.render(&request) {
                    io.write_output(Output::feedback(format!("Could not write output: {}", e)))?;
                }
            }
            CommandResult::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn update_prompt(&self, io: &mut impl IoHost) -> Result<(), IoError> {
        io.write_prompt(PromptConfig {
            path: self.ctx.session().display_path(),
            colorize: self.ctx.session().colorize(),
        })
    }
}

/// A batch run has no interactive terminal to page on, whatever the
/// session's output mode says.
fn effective_destination(destination: Destination, interactive: bool) -> Destination {
    match destination {
        Destination::Interactive if !interactive => Destination::Plain,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{InputLine, OutputStyle};
    use crate::testing::MockClient;
    use serde_json::json;
    use std::collections::VecDeque;

    struct MockHost {
        inputs: VecDeque<String>,
        signals: VecDeque<Signal>,
        outputs: Vec<Output>,
        prompts: Vec<PromptConfig>,
    }

    impl MockHost {
        fn with_inputs(inputs: Vec<&str>) -> Self {
            Self {
                inputs: inputs.into_iter().map(String::from).collect(),
                signals: VecDeque::new(),
                outputs: Vec::new(),
                prompts: Vec::new(),
            }
        }

        fn with_signal(mut self, signal: Signal) -> Self {
            self.signals.push_back(signal);
            self
        }
    }

    impl IoHost for MockHost {
        fn wait_for_input(&mut self) -> Result<(), IoError> {
            Ok(())
        }

        fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
            Ok(self.inputs.pop_front().map(|line| InputLine { line }))
        }

        fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
            if self.inputs.is_empty() {
                Ok(self.signals.pop_front())
            } else {
                Ok(None)
            }
        }

        fn write_output(&mut self, output: Output) -> Result<(), IoError> {
            self.outputs.push(output);
            Ok(())
        }

        fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
            self.prompts.push(config);
            Ok(())
        }
    }

    fn core_with(client: MockClient) -> (Arc<MockClient>, ReplCore) {
        let client = Arc::new(client);
        let core = ReplCore::new(client.clone(), ColorMode::Never);
        (client, core)
    }

    #[test]
    fn exit_command_ends_loop() {
        let (_, mut core) = core_with(MockClient::new());
        let mut host = MockHost::with_inputs(vec!["exit"]);

        let result = core.run(&mut host);

        assert!(matches!(result, Ok(ExitReason::UserExit)));
        assert!(host
            .outputs
            .iter()
            .any(|o| o.style == OutputStyle::Banner && o.text == "Connected to CosmosDB"));
    }

    #[test]
    fn eof_signal_ends_loop() {
        let (_, mut core) = core_with(MockClient::new());
        let mut host = MockHost::with_inputs(vec![]).with_signal(Signal::Eof);

        let result = core.run(&mut host);

        assert!(matches!(result, Ok(ExitReason::Eof)));
    }

    #[test]
    fn interrupt_mid_line_aborts_line_but_keeps_session() {
        let (_, mut core) = core_with(MockClient::new());
        let mut host = MockHost::with_inputs(vec!["database mydb"])
            .with_signal(Signal::Interrupt { line_empty: false });
        host.signals.push_back(Signal::Eof);

        let result = core.run(&mut host);

        assert!(matches!(result, Ok(ExitReason::Eof)));
        // The selection made before the interrupt survives.
        assert_eq!(
            core.context().session().current_database.as_deref(),
            Some("mydb")
        );
        assert!(host
            .outputs
            .iter()
            .any(|o| o.style == OutputStyle::Feedback && o.text == "^C"));
    }

    #[test]
    fn interrupt_at_idle_prompt_exits_shell() {
        let (_, mut core) = core_with(MockClient::new());
        let mut host =
            MockHost::with_inputs(vec![]).with_signal(Signal::Interrupt { line_empty: true });

        let result = core.run(&mut host);

        assert!(matches!(result, Ok(ExitReason::Interrupted)));
        assert!(!host
            .outputs
            .iter()
            .any(|o| o.style == OutputStyle::Feedback && o.text == "^C"));
    }

    #[test]
    fn prompt_tracks_selection_changes() {
        let (_, mut core) = core_with(MockClient::new().with_collections("mydb", &["mycoll"]));
        let mut host =
            MockHost::with_inputs(vec!["database mydb", "collection mycoll", "exit"]);

        core.run(&mut host).unwrap();

        let paths: Vec<&str> = host.prompts.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, ["", "/dbs/mydb/colls/", "/dbs/mydb/colls/mycoll"]);
    }

    #[test]
    fn full_query_scenario_updates_last_result() {
        let (client, mut core) = core_with(
            MockClient::new()
                .with_collections("mydb", &["mycoll"])
                .with_documents(vec![json!({"id": "1", "active": true})]),
        );
        let mut host = MockHost::with_inputs(vec![
            "database mydb",
            "collection mycoll",
            "pager false",
            "select * from c where c.active = true",
            "exit",
        ]);

        core.run(&mut host).unwrap();

        assert_eq!(
            *client.queries.lock().unwrap(),
            vec![(
                "mydb".to_string(),
                "mycoll".to_string(),
                "SELECT * from c where c.active = true".to_string()
            )]
        );
        assert_eq!(
            core.context().session().last_result.as_deref(),
            Some("[\n  {\n    \"active\": true,\n    \"id\": \"1\"\n  }\n]")
        );
    }

    #[test]
    fn unknown_command_is_feedback_and_loop_continues() {
        let (_, mut core) = core_with(MockClient::new());
        let mut host = MockHost::with_inputs(vec!["bogus", "exit"]);

        let result = core.run(&mut host);

        assert!(matches!(result, Ok(ExitReason::UserExit)));
        assert!(host
            .outputs
            .iter()
            .any(|o| o.style == OutputStyle::Feedback && o.text.contains("bogus")));
    }

    #[test]
    fn batch_mode_runs_commands_in_order_and_returns() {
        let (client, mut core) = core_with(
            MockClient::new()
                .with_collections("db", &["c"])
                .with_documents(vec![json!(1)]),
        );
        let mut host = MockHost::with_inputs(vec![]);
        let lines: Vec<String> = ["database db", "collection c", "pager false", "select *"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        core.run_batch(&lines, &mut host).unwrap();

        assert_eq!(client.query_count(), 1);
        // No banner, no prompt in batch mode.
        assert!(host.prompts.is_empty());
        assert!(!host
            .outputs
            .iter()
            .any(|o| o.style == OutputStyle::Banner));
    }

    #[test]
    fn batch_runs_never_target_the_pager() {
        assert_eq!(
            effective_destination(Destination::Interactive, false),
            Destination::Plain
        );
        // Explicit destinations pass through untouched.
        assert_eq!(
            effective_destination(Destination::Plain, false),
            Destination::Plain
        );
        assert_eq!(
            effective_destination(
                Destination::File {
                    path: "out.json".to_string(),
                    append: true,
                },
                false
            ),
            Destination::File {
                path: "out.json".to_string(),
                append: true,
            }
        );
        assert_eq!(
            effective_destination(Destination::Pipe("wc -l".to_string()), false),
            Destination::Pipe("wc -l".to_string())
        );
    }

    #[test]
    fn interactive_runs_keep_the_paged_destination() {
        assert_eq!(
            effective_destination(Destination::Interactive, true),
            Destination::Interactive
        );
    }

    #[test]
    fn batch_select_in_paged_mode_still_completes() {
        // Default output mode is paged; a batch run must print instead of
        // blocking on a pager.
        let (client, mut core) = core_with(
            MockClient::new()
                .with_collections("db", &["c"])
                .with_documents(vec![json!({"id": "1"})]),
        );
        let mut host = MockHost::with_inputs(vec![]);
        let lines: Vec<String> = ["database db", "collection c", "select *"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        core.run_batch(&lines, &mut host).unwrap();

        assert_eq!(client.query_count(), 1);
        assert!(core.context().session().last_result.is_some());
    }

    #[test]
    fn export_writes_last_result_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("result.json");

        let (_, mut core) = core_with(
            MockClient::new()
                .with_collections("db", &["c"])
                .with_documents(vec![json!({"id": "1"})]),
        );
        let lines: Vec<String> = [
            "database db".to_string(),
            "collection c".to_string(),
            "pager false".to_string(),
            "select *".to_string(),
            format!("export {}", target.display()),
        ]
        .into_iter()
        .collect();
        let mut host = MockHost::with_inputs(vec![]);

        core.run_batch(&lines, &mut host).unwrap();

        let expected = core
            .context()
            .session()
            .last_result
            .clone()
            .expect("query stored a result");
        assert_eq!(std::fs::read_to_string(&target).unwrap(), expected);
    }

    #[test]
    fn preselect_applies_flags_and_warns_on_bad_database() {
        let (_, mut core) = core_with(MockClient::new().with_list_failure());
        let mut host = MockHost::with_inputs(vec![]);

        core.preselect(Some("mydb"), Some("mycoll"), &mut host)
            .unwrap();

        assert_eq!(
            core.context().session().collection_path(true).unwrap(),
            "/dbs/mydb/colls/mycoll"
        );
        assert!(host
            .outputs
            .iter()
            .any(|o| o.style == OutputStyle::Feedback && o.text.contains("Warning")));
    }
}
