//! Pipeline driver - runs the three phases against one context

use crate::core::{Configuration, Context, EvalError, Evaluate, Phase, Value};
use std::fmt;
use tracing::info;

/// Events that can occur during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionEvent {
    PhaseStarted {
        phase: Phase,
        steps: usize,
    },
    StepCompleted {
        phase: Phase,
        index: usize,
        value: Value,
    },
    StepFailed {
        phase: Phase,
        index: usize,
        error: String,
    },
    RunCompleted,
}

impl fmt::Display for ExecutionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionEvent::PhaseStarted { phase, steps } => {
                write!(f, "{} phase started ({} steps)", phase, steps)
            }
            ExecutionEvent::StepCompleted { phase, index, value } => {
                write!(f, "{}[{}] completed: {:?}", phase, index, value)
            }
            ExecutionEvent::StepFailed { phase, index, error } => {
                write!(f, "{}[{}] failed: {}", phase, index, error)
            }
            ExecutionEvent::RunCompleted => f.write_str("run completed"),
        }
    }
}

/// Type for event handlers
pub type EventHandler = Box<dyn Fn(&ExecutionEvent) + Send + Sync>;

/// Runs a [`Configuration`] phase by phase
///
/// Steps run strictly in order; the first error stops the run and is
/// returned unchanged.
#[derive(Default)]
pub struct ExecutionEngine {
    event_handlers: Vec<EventHandler>,
}

impl ExecutionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Box::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Execute `before`, `pipeline` and `after`
    pub async fn run(&self, config: &Configuration, ctx: &mut Context) -> Result<(), EvalError> {
        for (phase, steps) in config.phases() {
            if steps.is_empty() {
                continue;
            }

            info!("Starting {} phase ({} steps)", phase, steps.len());
            self.emit_event(ExecutionEvent::PhaseStarted {
                phase,
                steps: steps.len(),
            });

            for (index, step) in steps.iter().enumerate() {
                match step.evaluate(ctx).await {
                    Ok(value) => {
                        self.emit_event(ExecutionEvent::StepCompleted { phase, index, value });
                    }
                    Err(error) => {
                        self.emit_event(ExecutionEvent::StepFailed {
                            phase,
                            index,
                            error: error.to_string(),
                        });
                        return Err(error);
                    }
                }
            }
        }

        self.emit_event(ExecutionEvent::RunCompleted);
        Ok(())
    }
}
