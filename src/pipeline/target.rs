//! Target definitions
//!
//! The set of targets is closed. Each one declares:
//! - `depends_on`: targets that must run first and are pulled into the plan
//! - `triggers`: targets pulled into the plan to run after this one
//! - `before`: ordering constraint only, nothing is pulled in
//! - `requires_release`: fail up front unless Configuration == Release
//! - `gate`: branch predicate; when false the target is skipped

use crate::core::context::RepositoryInfo;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, clap::ValueEnum)]
pub enum Target {
  /// Print the resolved configuration
  Info,
  /// Clean previous outputs and the artifacts directory
  Clean,
  /// Restore package dependencies
  Restore,
  /// Build with version stamps
  Compile,
  /// Produce package artifacts
  Pack,
  /// Push artifacts to the GitHub package feed
  #[value(name = "publish-to-github", alias = "publishtogithub")]
  PublishToGithub,
  /// Push artifacts to the MyGet pre-release feed
  #[value(name = "publish-to-myget", alias = "publishtomyget")]
  PublishToMyGet,
  /// Push artifacts to the NuGet public feed
  #[value(name = "publish-to-nuget", alias = "publishtonuget")]
  PublishToNuGet,
  /// Create and publish a GitHub release with the artifacts attached
  #[value(name = "create-release", alias = "createrelease")]
  CreateRelease,
}

/// Branch predicates evaluated when the plan is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
  DevelopOrPullRequest,
  ReleaseBranch,
  MainOrMaster,
  MainOrMasterOrReleaseBranch,
}

impl Gate {
  pub fn allows(self, repo: &RepositoryInfo) -> bool {
    match self {
      Gate::DevelopOrPullRequest => repo.is_on_develop_branch() || repo.is_pull_request,
      Gate::ReleaseBranch => repo.is_on_release_branch(),
      Gate::MainOrMaster => repo.is_on_main_or_master_branch(),
      Gate::MainOrMasterOrReleaseBranch => repo.is_on_main_or_master_branch() || repo.is_on_release_branch(),
    }
  }

  pub fn describe(self) -> &'static str {
    match self {
      Gate::DevelopOrPullRequest => "develop branch or pull request",
      Gate::ReleaseBranch => "release branch",
      Gate::MainOrMaster => "main/master branch",
      Gate::MainOrMasterOrReleaseBranch => "main/master or release branch",
    }
  }
}

/// Static declaration of one target
#[derive(Debug, Clone, Copy)]
pub struct TargetDefinition {
  pub description: &'static str,
  pub depends_on: &'static [Target],
  pub triggers: &'static [Target],
  pub before: &'static [Target],
  pub requires_release: bool,
  pub gate: Option<Gate>,
}

impl Target {
  pub const ALL: [Target; 9] = [
    Target::Info,
    Target::Clean,
    Target::Restore,
    Target::Compile,
    Target::Pack,
    Target::PublishToGithub,
    Target::PublishToMyGet,
    Target::PublishToNuGet,
    Target::CreateRelease,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Target::Info => "Info",
      Target::Clean => "Clean",
      Target::Restore => "Restore",
      Target::Compile => "Compile",
      Target::Pack => "Pack",
      Target::PublishToGithub => "PublishToGithub",
      Target::PublishToMyGet => "PublishToMyGet",
      Target::PublishToNuGet => "PublishToNuGet",
      Target::CreateRelease => "CreateRelease",
    }
  }

  pub fn definition(self) -> TargetDefinition {
    const PUBLISHERS: &[Target] = &[Target::PublishToGithub, Target::PublishToMyGet, Target::PublishToNuGet];

    match self {
      Target::Info => TargetDefinition {
        description: "Configures the build",
        depends_on: &[],
        triggers: &[],
        before: &[],
        requires_release: false,
        gate: None,
      },
      Target::Clean => TargetDefinition {
        description: "Cleaning project",
        depends_on: &[Target::Info],
        triggers: &[],
        before: &[Target::Restore],
        requires_release: false,
        gate: None,
      },
      Target::Restore => TargetDefinition {
        description: "Restoring project dependencies",
        depends_on: &[Target::Clean],
        triggers: &[],
        before: &[],
        requires_release: false,
        gate: None,
      },
      Target::Compile => TargetDefinition {
        description: "Building project with the version",
        depends_on: &[Target::Restore],
        triggers: &[],
        before: &[],
        requires_release: false,
        gate: None,
      },
      Target::Pack => TargetDefinition {
        description: "Packing project with the version",
        depends_on: &[Target::Compile],
        triggers: PUBLISHERS,
        before: &[],
        requires_release: true,
        gate: None,
      },
      Target::PublishToGithub => TargetDefinition {
        description: "Publishing to GitHub for development only",
        depends_on: &[],
        triggers: &[Target::CreateRelease],
        before: &[],
        requires_release: true,
        gate: Some(Gate::DevelopOrPullRequest),
      },
      Target::PublishToMyGet => TargetDefinition {
        description: "Publishing to MyGet for pre-release only",
        depends_on: &[],
        triggers: &[Target::CreateRelease],
        before: &[],
        requires_release: true,
        gate: Some(Gate::ReleaseBranch),
      },
      Target::PublishToNuGet => TargetDefinition {
        description: "Publishing to NuGet with the version",
        depends_on: &[],
        triggers: &[Target::CreateRelease],
        before: &[],
        requires_release: true,
        gate: Some(Gate::MainOrMaster),
      },
      Target::CreateRelease => TargetDefinition {
        description: "Creating release for the publishable version",
        depends_on: &[],
        triggers: &[],
        before: &[],
        requires_release: true,
        gate: Some(Gate::MainOrMasterOrReleaseBranch),
      },
    }
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
