//! Application orchestration: configuration, probing, report, export

use crate::{
    cli::Cli,
    config,
    error::Result,
    executor::Aggregator,
    export::ExportDocument,
    logging::Logger,
    models::BenchConfig,
    output::{ConsoleObserver, ReportRenderer},
};

pub struct App {
    config: BenchConfig,
    logger: Logger,
}

impl App {
    /// Build the application from parsed command-line arguments
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = config::load_config(cli)?;
        let mut logger = Logger::new(config.debug, config.enable_color);
        if config.quiet {
            logger = logger.quieted();
        }
        Ok(Self { config, logger })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Run the full benchmark
    ///
    /// A completed run returns `Ok` no matter how many individual probes
    /// failed; only configuration and export problems are errors.
    pub async fn run(&self) -> Result<()> {
        self.logger.debug(&format!(
            "probing {} providers x {} methods, {} samples per pair",
            self.config.endpoints.len(),
            self.config.methods.len(),
            self.config.num_tests
        ));

        let observer = ConsoleObserver::new(&self.config);
        let aggregator = Aggregator::new(self.config.clone());
        let result = aggregator.run(&observer).await?;

        let logger = self.logger.clone().with_run_id(result.run_id);
        logger.debug("all probes complete, rendering report");

        ReportRenderer::new(&self.config, &result).print();

        if let Some(path) = &self.config.export {
            let document = ExportDocument::from_result(&self.config, &result);
            document.write_to(path)?;
            logger.info(&format!("results exported to {}", path.display()));
        }

        Ok(())
    }
}
