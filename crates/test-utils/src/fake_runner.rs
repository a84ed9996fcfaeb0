use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tvdeploy::exec::{CommandResult, CommandSpec, ProcessRunner};

/// Successful result with the given stdout.
pub fn ok(output: &str) -> CommandResult {
    CommandResult {
        success: true,
        output: output.to_string(),
        error: String::new(),
    }
}

/// Failed result with the given stdout / stderr.
pub fn failed(output: &str, error: &str) -> CommandResult {
    CommandResult {
        success: false,
        output: output.to_string(),
        error: error.to_string(),
    }
}

#[derive(Default)]
struct Script {
    responses: Vec<(String, CommandResult)>,
    calls: Vec<CommandSpec>,
}

/// A fake process runner that:
/// - records every command it was asked to run
/// - answers with the result scripted for the command's first argument
///   (`connect`, `install`, `run`, ...), or an empty success otherwise.
///
/// Clones share the same script and call record.
#[derive(Clone, Default)]
pub struct FakeRunner {
    script: Arc<Mutex<Script>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the result for commands whose first argument is `subcommand`.
    /// A later script for the same subcommand replaces the earlier one.
    pub fn on(self, subcommand: &str, result: CommandResult) -> Self {
        {
            let mut script = self.script.lock().unwrap();
            script.responses.retain(|(sub, _)| sub != subcommand);
            script.responses.push((subcommand.to_string(), result));
        }
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.script.lock().unwrap().calls.clone()
    }

    /// Recorded calls whose first argument is `subcommand`.
    pub fn calls_to(&self, subcommand: &str) -> Vec<CommandSpec> {
        self.calls()
            .into_iter()
            .filter(|c| c.args.first().map(String::as_str) == Some(subcommand))
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().unwrap().calls.len()
    }

    /// First arguments of all recorded calls, in order.
    pub fn subcommands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| c.args.first().cloned().unwrap_or_default())
            .collect()
    }
}

impl ProcessRunner for FakeRunner {
    fn run<'a>(
        &'a self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + 'a>> {
        let result = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(spec.clone());
            let sub = spec.args.first().map(String::as_str).unwrap_or_default();
            script
                .responses
                .iter()
                .find(|(s, _)| s == sub)
                .map(|(_, r)| r.clone())
                .unwrap_or_else(|| ok(""))
        };

        Box::pin(async move { result })
    }
}
