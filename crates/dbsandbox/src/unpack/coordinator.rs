//! Drives one unpack request from flags to a finished directory.
//!
//! Stages run strictly in order and the first failure aborts the request;
//! nothing already written is rolled back.

use std::path::PathBuf;

use dbsandbox_archive::ArchiveReport;

use crate::config::display_home;
use crate::error::UnpackError;
use crate::unpack::collab::Collaborators;
use crate::unpack::guard::check_conflicts;
use crate::unpack::request::{ArchiveReference, UnpackRequest};
use crate::unpack::resolve::{ResolvedPlan, resolve_destination, resolve_version, validate_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    VersionResolved,
    DestinationComputed,
    NameValidated,
    ConflictChecked,
    ShellMerge,
    Extract,
    Done,
}

/// Which branch finished the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Merged,
    Extracted { renamed_from: Option<PathBuf> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackOutcome {
    pub plan: ResolvedPlan,
    pub completion: Completion,
    pub report: ArchiveReport,
}

pub struct Unpacker<C> {
    collab: C,
}

impl<C: Collaborators> Unpacker<C> {
    pub fn new(collab: C) -> Self {
        Self { collab }
    }

    pub fn collaborators(&self) -> &C {
        &self.collab
    }

    /// Resolve version, destination and bare name without touching the disk.
    pub fn plan(
        &self,
        archive: &ArchiveReference,
        request: &UnpackRequest,
    ) -> Result<ResolvedPlan, UnpackError> {
        let mut stage = Stage::Init;
        self.plan_stages(archive, request, &mut stage)
    }

    /// Run the whole request.
    pub fn run(
        &self,
        archive: &ArchiveReference,
        request: &UnpackRequest,
    ) -> Result<UnpackOutcome, UnpackError> {
        let mut stage = Stage::Init;
        let result = self.run_stages(archive, request, &mut stage);
        if let Err(err) = &result {
            tracing::debug!(stage = ?stage, kind = ?err.kind(), "unpack failed");
        }
        result
    }

    fn plan_stages(
        &self,
        archive: &ArchiveReference,
        request: &UnpackRequest,
        stage: &mut Stage,
    ) -> Result<ResolvedPlan, UnpackError> {
        if let (Some(target), false) = (&request.target_override, request.shell) {
            return Err(UnpackError::InvalidFlagCombination {
                target: target.clone(),
            });
        }

        let effective_version = resolve_version(
            archive,
            request.explicit_version.as_deref(),
            |version| self.collab.version_to_port(version),
        )?;
        advance(stage, Stage::VersionResolved);

        let destination = resolve_destination(
            &request.base_dir,
            &request.prefix,
            &effective_version,
            request.target_override.as_deref(),
        )?;
        advance(stage, Stage::DestinationComputed);

        let barename = validate_name(archive)?;
        advance(stage, Stage::NameValidated);

        Ok(ResolvedPlan {
            effective_version,
            destination,
            barename,
        })
    }

    fn run_stages(
        &self,
        archive: &ArchiveReference,
        request: &UnpackRequest,
        stage: &mut Stage,
    ) -> Result<UnpackOutcome, UnpackError> {
        let plan = self.plan_stages(archive, request, stage)?;

        check_conflicts(&request.base_dir, &plan.destination, request.shell, |path| {
            self.collab.dir_exists(path)
        })?;
        advance(stage, Stage::ConflictChecked);

        let outcome = if request.shell {
            advance(stage, Stage::ShellMerge);
            self.merge(archive, request, plan)?
        } else {
            advance(stage, Stage::Extract);
            self.extract(archive, request, plan)?
        };

        advance(stage, Stage::Done);
        Ok(outcome)
    }

    fn merge(
        &self,
        archive: &ArchiveReference,
        request: &UnpackRequest,
        plan: ResolvedPlan,
    ) -> Result<UnpackOutcome, UnpackError> {
        tracing::info!(
            "Merging shell tarball {} to {}",
            display_home(archive.path()),
            display_home(&plan.destination)
        );

        let report = self
            .collab
            .merge_shell_archive(
                archive.path(),
                &request.base_dir,
                &plan.destination,
                &plan.barename,
                request.verbosity,
            )
            .map_err(|source| UnpackError::Merge {
                archive: archive.path().to_path_buf(),
                destination: plan.destination.clone(),
                source,
            })?;

        Ok(UnpackOutcome {
            plan,
            completion: Completion::Merged,
            report,
        })
    }

    fn extract(
        &self,
        archive: &ArchiveReference,
        request: &UnpackRequest,
        plan: ResolvedPlan,
    ) -> Result<UnpackOutcome, UnpackError> {
        tracing::info!(
            "Unpacking tarball {} to {}",
            display_home(archive.path()),
            display_home(&plan.destination)
        );

        let extraction = self
            .collab
            .extract_archive(archive.path(), &request.base_dir, request.verbosity)
            .map_err(|source| UnpackError::Extraction {
                archive: archive.path().to_path_buf(),
                source,
            })?;

        if extraction.produced != plan.barename {
            tracing::warn!(
                produced = %extraction.produced,
                expected = %plan.barename,
                "tarball unpacked to an unexpected directory"
            );
        }

        let final_name = request.base_dir.join(&plan.barename);
        let renamed_from = if final_name != plan.destination {
            tracing::info!(
                "Renaming directory {} to {}",
                display_home(&final_name),
                display_home(&plan.destination)
            );
            self.collab
                .rename_dir(&final_name, &plan.destination)
                .map_err(|source| UnpackError::Rename {
                    from: final_name.clone(),
                    to: plan.destination.clone(),
                    source,
                })?;
            Some(final_name)
        } else {
            None
        };

        Ok(UnpackOutcome {
            plan,
            completion: Completion::Extracted { renamed_from },
            report: extraction.report,
        })
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    tracing::debug!(from = ?*stage, to = ?next, "unpack stage");
    *stage = next;
}
