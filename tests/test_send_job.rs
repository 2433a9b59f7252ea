use clap::Parser;
use ruidakit::cli::{Cli, Commands};
use ruidakit::{bed_size, build_session, open_device, send_job, BedSizeSource, Config, Job};
use ruidakit_core::codec::{scramble, unscramble};
use tempfile::TempDir;

const JOB: &str = r#"{
    "name": "",
    "parts": [
        {
            "x": 0.0, "y": 0.0, "width": 40.0, "height": 20.0,
            "commands": [
                {"type": "set_property", "property": "speed", "value": 120.0},
                {"type": "set_property", "property": "min_power", "value": 10},
                {"type": "set_property", "property": "max_power", "value": 95},
                {"type": "move_to", "x": 0.0, "y": 0.0},
                {"type": "line_to", "x": 40.0, "y": 0.0},
                {"type": "line_to", "x": 40.0, "y": 20.0}
            ]
        },
        {
            "x": 50.0, "y": 0.0, "width": 10.0, "height": 10.0,
            "commands": []
        }
    ]
}"#;

fn file_config(dir: &TempDir) -> Config {
    let mut config = Config::new();
    config.connection.target = dir.path().join("out.rd").display().to_string();
    config
}

#[test]
fn test_send_job_to_file() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    let job = Job::from_json(JOB).unwrap();

    let summary = send_job(&config, &job).unwrap();
    assert_eq!(summary.name, "thunder.rd");
    assert_eq!(summary.parts, 2);
    assert_eq!(summary.layers, 1);

    let bytes = std::fs::read(dir.path().join("out.rd")).unwrap();
    assert_eq!(&bytes[..2], scramble(&[0xE8, 0x02]).as_slice());
    let magic = bytes
        .windows(3)
        .position(|w| w == [0xD2, 0x9B, 0xFA])
        .unwrap();
    assert_eq!(unscramble(&bytes[..magic])[2..4], [0xE7, 0x01]);
    assert_eq!(*bytes.last().unwrap(), scramble(&[0xD7])[0]);
}

#[test]
fn test_power_is_clamped_to_machine_limit() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    let job = Job::from_json(JOB).unwrap();

    let session = build_session(&config, &job).unwrap();
    let layer = &session.layers()[0];
    assert_eq!(layer.max_power(), 70);
    assert_eq!(layer.min_power(), 10);
    assert_eq!(layer.speed(), 120.0);
    assert!(!session.is_open());
}

#[test]
fn test_job_name_wins_over_config() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    let mut job = Job::from_json(JOB).unwrap();
    job.name = "plate.rd".to_string();
    assert_eq!(build_session(&config, &job).unwrap().name(), "plate.rd");
}

#[test]
fn test_empty_job_fails() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    let err = send_job(&config, &Job::default()).unwrap_err();
    assert!(!err.is_transport_error());
}

#[test]
fn test_bed_size_sources() {
    let dir = TempDir::new().unwrap();
    let mut config = file_config(&dir);

    let size = bed_size(&config);
    assert_eq!(size.source, BedSizeSource::Fallback);
    assert_eq!((size.width_mm, size.height_mm), (900.0, 600.0));
    // the output file is left alone
    assert!(!dir.path().join("out.rd").exists());

    config.machine.bed_width_mm = 1300.0;
    config.machine.bed_height_mm = 900.0;
    let size = bed_size(&config);
    assert_eq!(size.source, BedSizeSource::Configured);
    assert_eq!(size.width_mm, 1300.0);
}

#[test]
fn test_queries_need_serial() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    assert!(open_device(&config).is_err());
}

#[test]
fn test_cli_parsing() {
    let cli = Cli::try_parse_from(["ruidakit", "--output", "job.rd", "send", "job.json"]).unwrap();
    assert!(matches!(cli.command, Commands::Send { .. }));
    assert_eq!(cli.target.output.unwrap().to_str(), Some("job.rd"));

    let cli = Cli::try_parse_from(["ruidakit", "query", "DA 00 00 26", "-v"]).unwrap();
    assert!(cli.verbose);
    assert!(matches!(cli.command, Commands::Query { ref opcode } if opcode == "DA 00 00 26"));

    assert!(Cli::try_parse_from(["ruidakit", "--serial", "a", "--host", "b", "model"]).is_err());
}

#[test]
fn test_job_round_trips_through_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("job.json");
    let job = Job::from_json(JOB).unwrap();
    std::fs::write(&path, serde_json::to_string_pretty(&job).unwrap()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(Job::from_json(&text).unwrap(), job);
}
