//! Case generator: runs a generator program once per test index

use std::path::Path;

use uuid::Uuid;

use crate::{
    constants::{DEFAULT_GROUP_POINTS, MAX_TEST_INDEX_ATTEMPTS},
    error::{AppError, AppResult},
    models::FileType,
};

use super::{
    compiler::Program,
    process,
    store::TestStore,
    toolchain::Language,
    GenerationOutcome, SkippedRun, TestPipeline,
};

impl TestPipeline {
    /// Generate `test_count` inputs with the generator named `generator_file`
    /// and append them to the group `group_name`.
    ///
    /// Indices continue after the highest index already in the group, so a
    /// fresh group gets `1..=test_count`. Each index is passed to the
    /// generator as its only argument. A failing run or store write is
    /// skipped and reported in the outcome; the batch goes on with the next
    /// index. Batches writing to the same group in this process take turns.
    pub async fn generate<S>(
        &self,
        store: &S,
        problem_id: Uuid,
        generator_file: &str,
        test_count: i32,
        group_name: &str,
    ) -> AppResult<GenerationOutcome>
    where
        S: TestStore + ?Sized,
    {
        let file = store
            .find_problem_file(problem_id, FileType::Generator, generator_file)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Generator file '{}' not found", generator_file))
            })?;

        if test_count > self.limits.max_tests_per_request {
            return Err(AppError::Validation(format!(
                "testCount must be at most {}",
                self.limits.max_tests_per_request
            )));
        }

        if test_count <= 0 {
            return Ok(GenerationOutcome {
                test_group_id: None,
                test_cases: Vec::new(),
                skipped: Vec::new(),
            });
        }

        let program = Program::prepare(
            &self.toolchain,
            &self.build_locks,
            Path::new(&file.file_path),
            self.limits.compile_timeout,
        )
        .await?;

        // Without an interpreter no index can succeed
        if program.language == Language::Python {
            self.toolchain.interpreter()?;
        }

        let group = store
            .find_or_create_group(problem_id, group_name, DEFAULT_GROUP_POINTS)
            .await?;
        let _group_guard = self.build_locks.acquire_group(group.id).await;
        let mut test_index = store.next_test_index(group.id).await?;

        let mut test_cases = Vec::with_capacity(test_count as usize);
        let mut skipped = Vec::new();

        for _ in 0..test_count {
            let mut attempt = 1;
            loop {
                let result = match self.run_generator(&program, test_index).await {
                    Ok(input) => {
                        store
                            .insert_test_case(problem_id, group.id, test_index, &input)
                            .await
                    }
                    Err(e) => Err(e),
                };

                match result {
                    Ok(test_case) => {
                        tracing::debug!(
                            problem_id = %problem_id,
                            test_index,
                            input = %test_case.input_preview(40),
                            "Generated test"
                        );
                        test_cases.push(test_case);
                    }
                    Err(AppError::AlreadyExists(_)) if attempt < MAX_TEST_INDEX_ATTEMPTS => {
                        // Another server wrote this index first
                        attempt += 1;
                        test_index = self.refresh_index(store, group.id, test_index).await;
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(
                            problem_id = %problem_id,
                            generator = %generator_file,
                            test_index,
                            error = %e,
                            "Test generation failed, skipping index"
                        );
                        skipped.push(SkippedRun {
                            test_index: Some(test_index),
                            test_case_id: None,
                            error: e.to_string(),
                        });
                    }
                }

                test_index += 1;
                break;
            }
        }

        tracing::info!(
            problem_id = %problem_id,
            group = %group.name,
            generated = test_cases.len(),
            skipped = skipped.len(),
            "Test generation finished"
        );

        Ok(GenerationOutcome {
            test_group_id: Some(group.id),
            test_cases,
            skipped,
        })
    }

    async fn run_generator(&self, program: &Program, test_index: i32) -> AppResult<String> {
        let invocation = program.invocation(&self.toolchain, vec![test_index.to_string().into()])?;
        let output = process::run(&invocation, None, self.limits.generator_timeout).await?;

        if !output.success() {
            return Err(AppError::ExecutionError(output.failure_summary()));
        }

        output.stored_stdout()
    }

    /// First free index after a conflict, or the next one if the store
    /// cannot say
    async fn refresh_index<S>(&self, store: &S, group_id: Uuid, taken: i32) -> i32
    where
        S: TestStore + ?Sized,
    {
        match store.next_test_index(group_id).await {
            Ok(next) => next.max(taken + 1),
            Err(e) => {
                tracing::warn!(group_id = %group_id, error = %e, "Could not re-read test index");
                taken + 1
            }
        }
    }
}
