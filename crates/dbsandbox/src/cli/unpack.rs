use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use dbsandbox_archive::Verbosity;

use crate::config::{DEFAULT_VERBOSITY, SANDBOX_BINARY_ENV, default_sandbox_binary};
use crate::unpack::{
    ArchiveReference, Completion, SystemCollaborators, UnpackRequest, Unpacker,
};

use super::progress::EntryTracker;

const LONG_ABOUT: &str = "\
If you want to create a sandbox from a tarball, you first need to unpack it
into the sandbox-binary directory. This command carries out that task, so that
afterwards the sandbox can be deployed with only the version of that tarball.
If the version is not contained in the tarball name, it should be supplied
using --unpack-version.
If there is already an expanded tarball with the same version, a new one can be
differentiated with --prefix.";

const EXAMPLES: &str = "\
Examples:
    $ dbsandbox unpack mysql-8.0.4-rc-linux-glibc2.12-x86_64.tar.gz
    Unpacking tarball mysql-8.0.4-rc-linux-glibc2.12-x86_64.tar.gz to $HOME/opt/mysql/8.0.4

    $ dbsandbox unpack --prefix=ps Percona-Server-5.7.21-linux.tar.gz
    Unpacking tarball Percona-Server-5.7.21-linux.tar.gz to $HOME/opt/mysql/ps5.7.21

    $ dbsandbox unpack --unpack-version=8.0.18 --prefix=bld mysql-mybuild.tar.gz
    Unpacking tarball mysql-mybuild.tar.gz to $HOME/opt/mysql/bld8.0.18

    $ dbsandbox unpack --shell mysql-shell-8.0.18-linux-glibc2.12-x86-64bit.tar.gz
    Merging shell tarball mysql-shell-8.0.18-linux-glibc2.12-x86-64bit.tar.gz to $HOME/opt/mysql/8.0.18";

#[derive(Args, Clone, Debug)]
#[command(long_about = LONG_ABOUT, after_help = EXAMPLES)]
pub struct UnpackArg {
    #[arg(value_name = "MySQL-tarball", help = "Tarball to unpack")]
    tarball: PathBuf,

    #[arg(
        long = "sandbox-binary",
        env = SANDBOX_BINARY_ENV,
        value_name = "DIR",
        help = "Binary repository [default: $HOME/opt/mysql]"
    )]
    sandbox_binary: Option<PathBuf>,

    #[arg(
        long,
        default_value_t = DEFAULT_VERBOSITY,
        value_parser = clap::value_parser!(u8).range(0..=2),
        help = "Level of verbosity during unpack (0=none, 2=maximum)"
    )]
    verbosity: u8,

    #[arg(long = "unpack-version", value_name = "VERSION", help = "Which version is contained in the tarball")]
    unpack_version: Option<String>,

    #[arg(long, default_value = "", help = "Prefix for the final expanded directory")]
    prefix: String,

    #[arg(long, help = "Unpack a shell tarball into the corresponding server directory")]
    shell: bool,

    #[arg(long = "target-server", value_name = "NAME", help = "Uses a different server to unpack a shell tarball")]
    target_server: Option<String>,
}

impl UnpackArg {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::try_from(self.verbosity).unwrap_or_default()
    }

    fn base_dir(&self) -> anyhow::Result<PathBuf> {
        let dir = match &self.sandbox_binary {
            Some(dir) => dir.clone(),
            None => default_sandbox_binary().context("cannot determine the home directory")?,
        };
        std::path::absolute(&dir)
            .with_context(|| format!("cannot resolve sandbox binary directory '{}'", dir.display()))
    }

    pub fn to_request(&self) -> anyhow::Result<UnpackRequest> {
        Ok(UnpackRequest::new(self.base_dir()?)
            .prefix(self.prefix.clone())
            .explicit_version(self.unpack_version.clone())
            .target_override(self.target_server.clone())
            .shell(self.shell)
            .verbosity(self.verbosity()))
    }

    pub fn run(self) -> anyhow::Result<()> {
        let request = self.to_request()?;
        let archive = ArchiveReference::new(&self.tarball);

        let tracker = (request.verbosity == Verbosity::Normal).then(|| EntryTracker::new("Unpacking"));
        let collab = match &tracker {
            Some(tracker) => SystemCollaborators::new().with_progress(tracker.callback()),
            None => SystemCollaborators::new(),
        };

        let result = Unpacker::new(collab).run(&archive, &request);
        if let Some(tracker) = tracker {
            tracker.finish();
        }
        let outcome = result?;

        tracing::debug!(
            destination = %outcome.plan.destination.display(),
            entries = outcome.report.entry_count,
            bytes = outcome.report.total_bytes,
            merged = matches!(outcome.completion, Completion::Merged),
            "unpack complete"
        );
        Ok(())
    }
}
