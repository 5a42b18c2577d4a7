//! Command dispatch

use anyhow::Context;
use clap::ArgMatches;
use orgdir_core::prelude::*;
use orgdir_store::{MemoryStore, Snapshot};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of one command
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// JSON printed to stdout
    pub value: Value,
    /// Whether the snapshot was written back
    pub persisted: bool,
}

/// A directory opened from a snapshot file
pub struct Session {
    directory: Directory,
    store: Arc<MemoryStore>,
    data: PathBuf,
}

impl Session {
    /// Load configuration named by `--config`, then apply the environment
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn config(matches: &ArgMatches) -> anyhow::Result<DirectoryConfig> {
        let config = match matches.get_one::<PathBuf>("config") {
            Some(path) => DirectoryConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => DirectoryConfig::new(),
        };
        Ok(config.apply_env())
    }

    /// Open the snapshot at `data`; a missing file is an empty directory
    ///
    /// # Errors
    /// Returns an error if the snapshot is unreadable or violates a constraint
    pub fn open(config: DirectoryConfig, data: &Path) -> anyhow::Result<Self> {
        let snapshot =
            Snapshot::load(data).with_context(|| format!("loading snapshot {}", data.display()))?;
        let store = Arc::new(
            MemoryStore::from_snapshot(snapshot)
                .with_context(|| format!("restoring snapshot {}", data.display()))?,
        );
        let directory = Directory::new(store.clone(), config);
        Ok(Self {
            directory,
            store,
            data: data.to_path_buf(),
        })
    }

    /// Directory facade
    #[inline]
    #[must_use]
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Write the current state back to the snapshot file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn persist(&self) -> anyhow::Result<()> {
        self.store
            .snapshot()
            .save(&self.data)
            .with_context(|| format!("saving snapshot {}", self.data.display()))?;
        tracing::debug!(path = %self.data.display(), "snapshot saved");
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("directory", &self.directory)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// Authorize the caller and run the selected subcommand
///
/// The presented key comes from `--api-key`; the expected one from
/// configuration or `ORGDIR_API_KEY`.
///
/// # Errors
/// Returns [`DirectoryError`] from authorization or the operation itself,
/// or a snapshot write failure
pub async fn run(session: &Session, matches: &ArgMatches) -> anyhow::Result<Outcome> {
    let presented = matches.get_one::<String>("api-key").map(String::as_str);
    session.directory().authorize(presented)?;

    let (name, args) = matches.subcommand().context("no command given")?;
    let (value, mutated) = dispatch(session.directory(), name, args, &session.store).await?;

    if mutated {
        session.persist()?;
    }
    Ok(Outcome {
        value,
        persisted: mutated,
    })
}

async fn dispatch(
    directory: &Directory,
    name: &str,
    args: &ArgMatches,
    store: &MemoryStore,
) -> anyhow::Result<(Value, bool)> {
    match name {
        "add-activity" => {
            let parent = args.get_one::<u64>("parent").copied().map(ActivityId);
            let node = directory.create_activity(text(args, "name")?, parent).await?;
            write(to_json(&node)?)
        }
        "activity" => read(to_json(&directory.activity(ActivityId(id(args, "id")?)).await?)?),
        "tree" => read(to_json(
            &directory.activity_tree(ActivityId(id(args, "id")?)).await?,
        )?),
        "trees" => read(to_json(&directory.activity_trees().await?)?),
        "delete-activity" => {
            let removed = directory
                .delete_activity(ActivityId(id(args, "id")?))
                .await?;
            write(json!({ "removed": removed }))
        }
        "link" => {
            let link = directory
                .link(
                    OrganizationId(id(args, "org")?),
                    ActivityId(id(args, "activity")?),
                )
                .await?;
            write(to_json(&link)?)
        }
        "unlink" => {
            directory
                .unlink(
                    OrganizationId(id(args, "org")?),
                    ActivityId(id(args, "activity")?),
                )
                .await?;
            write(json!({ "unlinked": true }))
        }
        "orgs-for-activity" => read(to_json(
            &directory
                .organizations_practicing(ActivityId(id(args, "id")?))
                .await?,
        )?),
        "activities-for-org" => read(to_json(
            &directory
                .activities_for_organization(OrganizationId(id(args, "id")?))
                .await?,
        )?),
        "add-building" => {
            let building = directory
                .create_building(NewBuilding {
                    country: args.get_one::<String>("country").cloned(),
                    city: text(args, "city")?.to_owned(),
                    street: text(args, "street")?.to_owned(),
                    house_number: text(args, "house")?.to_owned(),
                    latitude: args.get_one::<f64>("lat").copied(),
                    longitude: args.get_one::<f64>("lon").copied(),
                })
                .await?;
            write(to_json(&building)?)
        }
        "add-org" => {
            let organization = directory
                .create_organization(NewOrganization {
                    name: text(args, "name")?.to_owned(),
                    building_id: args.get_one::<u64>("building").copied().map(BuildingId),
                })
                .await?;
            write(to_json(&organization)?)
        }
        "add-phone" => {
            let phone = directory
                .create_phone(NewPhone {
                    number: text(args, "number")?.to_owned(),
                    organization_id: args.get_one::<u64>("org").copied().map(OrganizationId),
                })
                .await?;
            write(to_json(&phone)?)
        }
        "org" => read(to_json(
            &directory.organization(OrganizationId(id(args, "id")?)).await?,
        )?),
        "find-org" => read(to_json(
            &directory.find_organizations(text(args, "name")?).await?,
        )?),
        "orgs-in-building" => read(to_json(
            &directory
                .organizations_in_building(BuildingId(id(args, "id")?))
                .await?,
        )?),
        "orgs-in-area" => {
            let area = BoundingBox::from_corners(
                coordinate(args, "min-lat")?,
                coordinate(args, "min-lon")?,
                coordinate(args, "max-lat")?,
                coordinate(args, "max-lon")?,
            )?;
            read(to_json(&directory.organizations_in_area(&area).await?)?)
        }
        "snapshot" => {
            let snapshot = store.snapshot();
            if args.get_flag("compact") {
                read(json!({ "rows": snapshot.rows() }))
            } else {
                read(to_json(&snapshot)?)
            }
        }
        other => anyhow::bail!("unknown command `{other}`"),
    }
}

/// Process exit code for a failed command
///
/// Caller mistakes exit with 2, everything else with 1.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<DirectoryError>() {
        Some(err) if err.is_client_error() => 2,
        _ => 1,
    }
}

#[allow(clippy::unnecessary_wraps)]
fn read(value: Value) -> anyhow::Result<(Value, bool)> {
    Ok((value, false))
}

#[allow(clippy::unnecessary_wraps)]
fn write(value: Value) -> anyhow::Result<(Value, bool)> {
    Ok((value, true))
}

fn id(args: &ArgMatches, name: &str) -> anyhow::Result<u64> {
    args.get_one::<u64>(name)
        .copied()
        .with_context(|| format!("missing <{name}>"))
}

fn coordinate(args: &ArgMatches, name: &str) -> anyhow::Result<f64> {
    args.get_one::<f64>(name)
        .copied()
        .with_context(|| format!("missing --{name}"))
}

fn text<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing <{name}>"))
}

fn to_json(value: &impl Serialize) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(value)?)
}
