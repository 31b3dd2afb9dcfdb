//! Tests for command-line parsing and world configuration from flags

#[cfg(test)]
mod tests {
    use clap::Parser;
    use std::path::PathBuf;
    use towerwfc::algorithm::constraints::ConnectivityPolicy;
    use towerwfc::io::cli::{Cli, GrowthProfile, WorldRunner};
    use towerwfc::io::configuration::{
        DEFAULT_CHUNK_DIMENSIONS, DEFAULT_SEED, DEFAULT_SPAWN_RADIUS, MAX_SPAWN_RADIUS,
    };

    // Tests CLI parsing with no arguments uses the defaults
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_minimal_args() {
        let cli = Cli::parse_from(["program"]);
        assert_eq!(cli.seed, DEFAULT_SEED);
        assert_eq!(cli.radius, DEFAULT_SPAWN_RADIUS);
        assert_eq!([cli.width, cli.height, cli.depth], DEFAULT_CHUNK_DIMENSIONS);
        assert_eq!(cli.output, None);
        assert_eq!(cli.growth, GrowthProfile::Skewed);
        assert!(cli.should_show_progress());
    }

    // Tests the radius flag only accepts the supported range
    // Verified by parsing the radius without a range
    #[test]
    fn test_cli_radius_range() {
        let max = MAX_SPAWN_RADIUS.to_string();
        let too_far = (MAX_SPAWN_RADIUS + 1).to_string();
        assert!(Cli::try_parse_from(["program", "-r", max.as_str()]).is_ok());
        assert!(Cli::try_parse_from(["program", "-r", too_far.as_str()]).is_err());
        assert!(Cli::try_parse_from(["program", "-r", "-1"]).is_err());
        assert!(Cli::try_parse_from(["program", "-r", "2147483647"]).is_err());
    }

    // Tests the growth profile selects the tower height curve
    #[test]
    fn test_growth_profile() {
        let cli = Cli::parse_from(["program", "--growth", "linear"]);
        assert_eq!(cli.growth, GrowthProfile::Linear);
        assert!((cli.growth.curve().sample(0.4) - 0.4).abs() < 1e-9);
        assert!((GrowthProfile::Skewed.curve().sample(0.5) - 0.3).abs() < 1e-9);
    }

    // Tests CLI parsing with all available arguments
    // Verified by swapping the short flags for width and height
    #[test]
    fn test_cli_parse_all_args() {
        let cli = Cli::parse_from([
            "program",
            "--seed",
            "123",
            "-r",
            "2",
            "-w",
            "5",
            "-H",
            "4",
            "--depth",
            "6",
            "--output",
            "maps",
            "--quiet",
            "--vertical-only",
            "--no-towers",
        ]);
        assert_eq!(cli.seed, 123);
        assert_eq!(cli.radius, 2);
        assert_eq!([cli.width, cli.height, cli.depth], [5, 4, 6]);
        assert_eq!(cli.output, Some(PathBuf::from("maps")));
        assert!(!cli.should_show_progress());
    }

    // Tests flags flow into the world configuration
    // Verified by ignoring --vertical-only when building the config
    #[test]
    fn test_world_config_from_flags() {
        let cli = Cli::parse_from(["program", "-s", "9", "-w", "3", "--vertical-only", "--no-towers"]);
        let config = cli.world_config();
        assert_eq!(config.seed, 9);
        assert_eq!(config.chunk_dimensions[0], 3);
        assert_eq!(config.solver.connectivity, ConnectivityPolicy::VerticalOnly);
        assert!(!config.tower.enabled);

        let defaults = Cli::parse_from(["program"]).world_config();
        assert_eq!(defaults.solver.connectivity, ConnectivityPolicy::AllDirections);
        assert!(defaults.tower.enabled);
    }

    // Tests a quiet run generates the world and writes its maps
    #[test]
    fn test_runner_exports_maps() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let output = dir.path().to_string_lossy().to_string();
        let cli = Cli::parse_from([
            "program", "--quiet", "-r", "0", "-w", "4", "-H", "2", "--depth", "4", "-o",
            output.as_str(),
        ]);
        WorldRunner::new(cli).run()?;
        let exported = std::fs::read_dir(dir.path())?.count();
        assert!(exported <= 2);
        Ok(())
    }
}
