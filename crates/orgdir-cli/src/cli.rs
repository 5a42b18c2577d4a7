//! Command tree

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .value_parser(value_parser!(u64))
        .help(help)
}

fn coordinate_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .required(true)
        .allow_negative_numbers(true)
        .value_parser(value_parser!(f64))
        .help(help)
}

/// Build the `orgdir` command
#[must_use]
pub fn command() -> Command {
    Command::new("orgdir")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Organization directory with an activity taxonomy")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("data")
                .long("data")
                .global(true)
                .default_value("orgdir.json")
                .value_parser(value_parser!(PathBuf))
                .help("JSON snapshot holding the directory"),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .global(true)
                .help("API key presented by this caller"),
        )
        .subcommand(
            Command::new("add-activity")
                .about("Create an activity")
                .arg(Arg::new("name").required(true).help("Activity name"))
                .arg(
                    Arg::new("parent")
                        .long("parent")
                        .value_parser(value_parser!(u64))
                        .help("Parent activity id"),
                ),
        )
        .subcommand(
            Command::new("activity")
                .about("Show an activity")
                .arg(id_arg("id", "Activity id")),
        )
        .subcommand(
            Command::new("tree")
                .about("Show the tree rooted at an activity")
                .arg(id_arg("id", "Activity id")),
        )
        .subcommand(Command::new("trees").about("Show every root activity with its tree"))
        .subcommand(
            Command::new("delete-activity")
                .about("Delete an activity and all of its descendants")
                .arg(id_arg("id", "Activity id")),
        )
        .subcommand(
            Command::new("link")
                .about("Associate an organization with an activity")
                .arg(id_arg("org", "Organization id"))
                .arg(id_arg("activity", "Activity id")),
        )
        .subcommand(
            Command::new("unlink")
                .about("Remove an association")
                .arg(id_arg("org", "Organization id"))
                .arg(id_arg("activity", "Activity id")),
        )
        .subcommand(
            Command::new("orgs-for-activity")
                .about("Organizations practicing an activity or anything under it")
                .arg(id_arg("id", "Activity id")),
        )
        .subcommand(
            Command::new("activities-for-org")
                .about("Activities directly linked to an organization")
                .arg(id_arg("id", "Organization id")),
        )
        .subcommand(
            Command::new("add-building")
                .about("Create a building")
                .arg(Arg::new("city").long("city").required(true))
                .arg(Arg::new("street").long("street").required(true))
                .arg(Arg::new("house").long("house").required(true))
                .arg(Arg::new("country").long("country"))
                .arg(
                    Arg::new("lat")
                        .long("lat")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("lon")
                        .long("lon")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64)),
                ),
        )
        .subcommand(
            Command::new("add-org")
                .about("Create an organization")
                .arg(Arg::new("name").required(true).help("Organization name"))
                .arg(
                    Arg::new("building")
                        .long("building")
                        .value_parser(value_parser!(u64))
                        .help("Building id"),
                ),
        )
        .subcommand(
            Command::new("add-phone")
                .about("Create a phone number")
                .arg(Arg::new("number").required(true).help("Phone number"))
                .arg(
                    Arg::new("org")
                        .long("org")
                        .value_parser(value_parser!(u64))
                        .help("Owning organization id"),
                ),
        )
        .subcommand(
            Command::new("org")
                .about("Show an organization with its building, phones and activities")
                .arg(id_arg("id", "Organization id")),
        )
        .subcommand(
            Command::new("find-org")
                .about("Find organizations by name, ignoring case")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("orgs-in-building")
                .about("Organizations located in a building")
                .arg(id_arg("id", "Building id")),
        )
        .subcommand(
            Command::new("orgs-in-area")
                .about("Organizations inside a rectangle")
                .arg(coordinate_arg("min-lat", "South edge"))
                .arg(coordinate_arg("min-lon", "West edge"))
                .arg(coordinate_arg("max-lat", "North edge"))
                .arg(coordinate_arg("max-lon", "East edge")),
        )
        .subcommand(
            Command::new("snapshot")
                .about("Print the whole directory")
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .action(ArgAction::SetTrue)
                        .help("Row counts only"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn global_args_reach_subcommands() {
        let matches = command()
            .try_get_matches_from(["orgdir", "tree", "3", "--data", "x.json", "--api-key", "k"])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("data").unwrap(),
            &PathBuf::from("x.json")
        );
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "tree");
        assert_eq!(*sub.get_one::<u64>("id").unwrap(), 3);
    }

    #[test]
    fn negative_coordinates_parse() {
        let matches = command()
            .try_get_matches_from([
                "orgdir", "orgs-in-area", "--min-lat", "-10", "--min-lon", "-20.5", "--max-lat",
                "10", "--max-lon", "20",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(*sub.get_one::<f64>("min-lon").unwrap(), -20.5);
    }
}
