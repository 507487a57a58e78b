//! Output producer: pipes stored inputs through a solution

use std::path::Path;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::FileType,
};

use super::{compiler::Program, process, store::TestStore, ProductionOutcome, SkippedRun, TestPipeline};

impl TestPipeline {
    /// Run the solution named `solution_file` on every test case of the
    /// problem and store its trimmed standard output as the expected output.
    ///
    /// A compile failure aborts before any case is touched. A failing run or
    /// store write leaves that case's output unchanged and the batch
    /// continues.
    pub async fn produce_outputs<S>(
        &self,
        store: &S,
        problem_id: Uuid,
        solution_file: &str,
    ) -> AppResult<ProductionOutcome>
    where
        S: TestStore + ?Sized,
    {
        let file = store
            .find_problem_file(problem_id, FileType::Solution, solution_file)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Solution file '{}' not found", solution_file))
            })?;

        let program = Program::prepare(
            &self.toolchain,
            &self.build_locks,
            Path::new(&file.file_path),
            self.limits.compile_timeout,
        )
        .await?;

        let cases = store.list_test_cases(problem_id).await?;
        let mut test_cases = Vec::with_capacity(cases.len());
        let mut skipped = Vec::new();

        for case in cases {
            let result = match self.run_solution(&program, &case.input_data).await {
                Ok(output) => store.update_test_output(case.id, &output).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(updated) => test_cases.push(updated),
                Err(e) => {
                    tracing::warn!(
                        problem_id = %problem_id,
                        solution = %solution_file,
                        test_case_id = %case.id,
                        test_index = case.test_index,
                        error = %e,
                        "Solution run failed, leaving output unchanged"
                    );
                    skipped.push(SkippedRun {
                        test_index: None,
                        test_case_id: Some(case.id),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            problem_id = %problem_id,
            updated = test_cases.len(),
            skipped = skipped.len(),
            "Output production finished"
        );

        Ok(ProductionOutcome {
            test_cases,
            skipped,
        })
    }

    async fn run_solution(&self, program: &Program, input: &str) -> AppResult<String> {
        let invocation = program.invocation(&self.toolchain, Vec::new())?;
        let output = process::run(&invocation, Some(input), self.limits.solution_timeout).await?;

        if !output.success() {
            return Err(AppError::ExecutionError(output.failure_summary()));
        }

        output.stored_stdout()
    }
}
