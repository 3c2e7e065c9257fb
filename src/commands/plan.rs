//! # Plan Command Implementation
//!
//! This module implements the `plan` subcommand, which resolves the manifest
//! for the selected platform and shows, for every record, the action `sync`
//! would take: `clone` or `update` for projects, `download` or `present` for
//! archives, `copy`, `present` or `no source` for placements.
//!
//! Output is a tree by default, or the resolved plan as JSON with `--json`.
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::{Context, Result};
use clap::Args;
use ptree::{print_tree, TreeItem};
use serde::Serialize;

use update_common::archive;
use update_common::manifest::Plan;
use update_common::placement;
use update_common::repository;

use super::{LoadedManifest, ManifestArgs};

/// Show the resolved plan
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the `plan` command.
pub fn execute(args: PlanArgs) -> Result<()> {
    let loaded = args.manifest.load()?;

    if args.json {
        println!("{}", render_json(&loaded.plan)?);
    } else {
        let tree = build_tree(&loaded)?;
        print_tree(&tree).context("Failed to display plan")?;
    }
    Ok(())
}

#[derive(Serialize)]
struct PlanReport<'a> {
    #[serde(flatten)]
    plan: &'a Plan,
    actions: Actions,
}

#[derive(Serialize)]
struct Actions {
    projects: Vec<&'static str>,
    archives: Vec<&'static str>,
    placements: Vec<&'static str>,
}

fn actions(plan: &Plan) -> Result<Actions> {
    Ok(Actions {
        projects: plan
            .projects
            .iter()
            .map(|project| repository::planned_action(project).as_str())
            .collect(),
        archives: plan
            .archives
            .iter()
            .map(|target| {
                archive::is_present(target).map(|present| if present { "present" } else { "download" })
            })
            .collect::<update_common::error::Result<_>>()?,
        placements: plan
            .placements
            .iter()
            .map(|target| placement::planned(target).as_str())
            .collect(),
    })
}

fn render_json(plan: &Plan) -> Result<String> {
    let report = PlanReport {
        plan,
        actions: actions(plan)?,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn build_tree(loaded: &LoadedManifest) -> Result<TreeNode> {
    let plan = &loaded.plan;
    let actions = actions(plan)?;

    let skipped = loaded
        .manifest
        .projects
        .iter()
        .filter(|project| project.skip)
        .count();
    let mut projects_label = format!("Repositories ({})", plan.projects.len());
    if skipped > 0 {
        projects_label.push_str(&format!(", {} skipped", skipped));
    }

    let projects = plan
        .projects
        .iter()
        .zip(&actions.projects)
        .map(|(project, action)| {
            let revision = project
                .revision
                .as_deref()
                .map(|rev| format!(" @ {}", rev))
                .unwrap_or_default();
            TreeNode::leaf(format!(
                "[{}] {}{} -> {}",
                action,
                project.url,
                revision,
                project.path.display()
            ))
        })
        .collect();

    let archives = plan
        .archives
        .iter()
        .zip(&actions.archives)
        .map(|(target, action)| {
            TreeNode::leaf(format!("[{}] {} -> {}", action, target.url, target.dest.display()))
        })
        .collect();

    let placements = plan
        .placements
        .iter()
        .zip(&actions.placements)
        .map(|(target, action)| {
            TreeNode::leaf(format!(
                "[{}] {} -> {}",
                action,
                placement::source_path(target).display(),
                placement::destination_path(target).display()
            ))
        })
        .collect();

    Ok(TreeNode {
        label: format!(
            "{} ({}, root {})",
            loaded.path.display(),
            plan.platform,
            plan.root.display()
        ),
        children: vec![
            TreeNode {
                label: projects_label,
                children: projects,
            },
            TreeNode {
                label: format!("Archives ({})", plan.archives.len()),
                children: archives,
            },
            TreeNode {
                label: format!("Placements ({})", plan.placements.len()),
                children: placements,
            },
        ],
    })
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(label: String) -> Self {
        Self {
            label,
            children: vec![],
        }
    }
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}
