//! Shared test infrastructure: a builder over [`coresim::simulator::Simulator`]
//! so scenario tests can go straight from program text to a finished run.

use coresim::config::Config;
use coresim::isa::parser::parse_program;
use coresim::simulator::Simulator;
use coresim::stats::SimReport;
use coresim::SimResult;

pub struct TestContext {
    config: Config,
    forwarding: bool,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            forwarding: false,
        }
    }

    pub fn with_forwarding(mut self) -> Self {
        self.forwarding = true;
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_num_cores(mut self, n: usize) -> Self {
        self.config.num_cores = n;
        self
    }

    pub fn with_tick_budget(mut self, ticks: u64) -> Self {
        self.config.tick_budget = ticks;
        self
    }

    /// Builds and runs a simulator over `program_text` to completion.
    pub fn run(self, program_text: &str) -> SimResult<SimReport> {
        let program = parse_program(program_text).unwrap();
        let mut sim = Simulator::new(program, self.config, self.forwarding)?;
        sim.run()
    }

    /// Builds a simulator without running it, for step-by-step `tick()` tests.
    pub fn build(self, program_text: &str) -> Simulator {
        let program = parse_program(program_text).unwrap();
        Simulator::new(program, self.config, self.forwarding).unwrap()
    }
}
