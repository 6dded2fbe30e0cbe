//! Tests for the entry points, driven by the scripted simulator.

use std::path::Path;

use st_core::FixedClock;
use st_sim::{GUI_SCHEMA, GUI_VIEW, ScriptedSimulation, StopReason, VehicleState};
use st_traci::LaunchCommand;
use tempfile::TempDir;

use crate::CollectorConfig;

// ── Helpers ───────────────────────────────────────────────────────────────────

const NET: &str = r#"<net version="1.16">
    <edge id=":J1_0" function="internal"/>
    <edge id="E0" from="J0" to="J1"/>
    <edge id="E1" from="J1" to="J2"/>
    <junction id="J0" type="dead_end" x="0.00" y="0.00"/>
    <junction id="J1" type="priority" x="100.00" y="0.00"/>
    <junction id="J2" type="dead_end" x="200.00" y="0.00"/>
</net>
"#;

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn clock() -> Box<FixedClock> {
    Box::new(FixedClock::seconds())
}

fn fleet(n: usize, road: &str) -> Vec<VehicleState> {
    (0..n).map(|i| VehicleState::on(&format!("veh{i}"), road)).collect()
}

/// Config with every path inside `dir`.
fn config_in(dir: &Path) -> CollectorConfig {
    CollectorConfig {
        log_path:     dir.join("log").join("log_vehicle.txt"),
        output_dir:   dir.join("output"),
        network_path: dir.join("sumo").join("map.net.xml"),
        ..CollectorConfig::default()
    }
}

fn command(program: &str) -> LaunchCommand {
    LaunchCommand::new([program, "-c", "map.sumocfg"]).unwrap()
}

fn write_net(config: &CollectorConfig) {
    std::fs::create_dir_all(config.network_path.parent().unwrap()).unwrap();
    std::fs::write(&config.network_path, NET).unwrap();
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.records().map(|r| r.unwrap().iter().map(str::to_owned).collect()).collect()
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;

    #[test]
    fn defaults_match_conventional_layout() {
        let c = CollectorConfig::default();
        assert_eq!(c.max_steps, 400);
        assert_eq!(c.head_rows, 1000);
        assert_eq!(c.not_found_label, "NOT_FOUND_OR_FINAL_JUNCTION");
        assert_eq!(c.log_path, Path::new("log/log_vehicle.txt"));
        assert_eq!(c.network_path, Path::new("sumo/map.net.xml"));
        assert!(c.trajectory_paths().full.ends_with("output/output.csv"));
        assert!(c.junction_paths().head.ends_with("output/vehicle_junction_to_1000.csv"));
    }

    #[test]
    fn toml_overrides_only_given_keys() {
        let c = CollectorConfig::from_toml(
            r#"
            max_steps = 50
            sumo_command = ["sumo-gui", "-c", "a.sumocfg"]
            "#,
        )
        .unwrap();
        assert_eq!(c.max_steps, 50);
        assert_eq!(c.head_rows, 1000);
        assert!(c.launch_command().unwrap().is_gui());
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(CollectorConfig::from_toml("max_step = 5").is_err());
    }

    #[test]
    fn zero_step_ceiling_is_rejected() {
        let c = CollectorConfig { max_steps: 0, ..CollectorConfig::default() };
        assert!(c.step_limit().is_err());
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(CollectorConfig::default().launch_command().is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tmp();
        let path = dir.path().join("collector.toml");
        std::fs::write(&path, "head_rows = 10\nnot_found_label = \"-\"\n").unwrap();
        let c = CollectorConfig::load(&path).unwrap();
        assert_eq!(c.head_rows, 10);
        assert_eq!(c.label().as_str(), "-");
        assert!(CollectorConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}

// ── Basic loop ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod basic {
    use super::*;
    use crate::basic_simulation;

    #[test]
    fn logs_every_step_and_closes_once() {
        let dir = tmp();
        let config = config_in(dir.path());
        let sim = ScriptedSimulation::new(vec![fleet(1, "E0"), fleet(2, "E0"), fleet(0, "E0")]);
        let probe = sim.probe();

        let report =
            basic_simulation(&config, &command("sumo"), |_: &LaunchCommand| Ok(sim), clock())
                .unwrap();
        assert_eq!(report.summary.steps_executed, 3);
        assert_eq!(report.rows, 3);
        assert_eq!(probe.close_calls(), 1);
        assert_eq!(probe.gui_schema(), None);

        let text = std::fs::read_to_string(&config.log_path).unwrap();
        assert_eq!(text.matches(" st====================").count(), 3);
        assert!(text.contains("vehicle_id_list: ['veh0', 'veh1']"));
    }

    #[test]
    fn gui_command_sets_schema() {
        let dir = tmp();
        let sim = ScriptedSimulation::new(vec![fleet(1, "E0")]);
        let probe = sim.probe();
        basic_simulation(&config_in(dir.path()), &command("sumo-gui"), |_: &LaunchCommand| Ok(sim), clock())
            .unwrap();
        assert_eq!(probe.gui_schema(), Some((GUI_VIEW.to_owned(), GUI_SCHEMA.to_owned())));
    }

    #[test]
    fn configured_ceiling_is_honoured() {
        let dir = tmp();
        let config = CollectorConfig { max_steps: 7, ..config_in(dir.path()) };
        let sim = ScriptedSimulation::endless(fleet(1, "E0"));
        let probe = sim.probe();
        let report =
            basic_simulation(&config, &command("sumo"), |_: &LaunchCommand| Ok(sim), clock())
                .unwrap();
        assert_eq!(report.summary.stop_reason, StopReason::StepLimit);
        assert_eq!(probe.steps(), 7);
    }

    #[test]
    fn failing_step_still_closes_connection() {
        let dir = tmp();
        let sim = ScriptedSimulation::endless(fleet(1, "E0")).fail_step_at(2);
        let probe = sim.probe();
        let result =
            basic_simulation(&config_in(dir.path()), &command("sumo"), |_: &LaunchCommand| Ok(sim), clock());
        assert!(result.is_err());
        assert_eq!(probe.close_calls(), 1);
    }

    #[test]
    fn launch_failure_is_reported() {
        let dir = tmp();
        let result = basic_simulation(
            &config_in(dir.path()),
            &command("sumo"),
            |_: &LaunchCommand| -> st_traci::TraciResult<ScriptedSimulation> {
                Err(st_traci::TraciError::Launch("no such program".into()))
            },
            clock(),
        );
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("no such program"));
    }
}

// ── Trajectory export ─────────────────────────────────────────────────────────

#[cfg(test)]
mod trajectory {
    use super::*;
    use crate::trajectory_export;

    #[test]
    fn writes_sorted_head_and_full_files() {
        let dir = tmp();
        let config = CollectorConfig { head_rows: 2, ..config_in(dir.path()) };
        let mut v = VehicleState::on("veh0", "E0");
        v.speed = 10.0;
        let sim = ScriptedSimulation::new(vec![vec![v.clone()], vec![v, VehicleState::on("veh1", "E1")]]);

        let report =
            trajectory_export(&config, &command("sumo"), |_: &LaunchCommand| Ok(sim), clock())
                .unwrap();
        assert_eq!(report.rows, 3);

        let full = read_rows(&config.trajectory_paths().full);
        let head = read_rows(&config.trajectory_paths().head);
        assert_eq!(full.len(), 3);
        assert_eq!(head[..], full[..2]);

        let ids: Vec<_> = full.iter().map(|r| r[1].as_str()).collect();
        assert_eq!(ids, ["veh1", "veh0", "veh0"]);
        // Later sample of veh0 first.
        assert!(full[1][0] > full[2][0]);
        assert_eq!(full[1][6], "36.0");
    }

    #[test]
    fn gui_command_leaves_schema_alone() {
        let dir = tmp();
        let sim = ScriptedSimulation::new(vec![fleet(1, "E0")]);
        let probe = sim.probe();
        trajectory_export(&config_in(dir.path()), &command("sumo-gui"), |_: &LaunchCommand| Ok(sim), clock())
            .unwrap();
        assert_eq!(probe.gui_schema(), None);
        assert_eq!(probe.close_calls(), 1);
    }

    #[test]
    fn nothing_is_written_when_the_run_fails() {
        let dir = tmp();
        let config = config_in(dir.path());
        let sim = ScriptedSimulation::endless(fleet(2, "E0")).fail_queries_for("veh1");
        let probe = sim.probe();
        let result =
            trajectory_export(&config, &command("sumo"), |_: &LaunchCommand| Ok(sim), clock());
        assert!(result.is_err());
        assert_eq!(probe.close_calls(), 1);
        assert!(!config.trajectory_paths().full.exists());
    }
}

// ── Junction export ───────────────────────────────────────────────────────────

#[cfg(test)]
mod junction {
    use super::*;
    use crate::junction_export;

    #[test]
    fn unresolved_segments_keep_their_rows() {
        let dir = tmp();
        let config = config_in(dir.path());
        write_net(&config);
        let sim = ScriptedSimulation::new(vec![vec![
            VehicleState::on("veh0", "E0"),
            VehicleState::on("veh1", ":J1_0"),
            VehicleState::on("veh2", "E404"),
        ]]);

        let report =
            junction_export(&config, &command("sumo"), |_: &LaunchCommand| Ok(sim), clock())
                .unwrap();
        assert_eq!(report.rows, 3);

        let rows = read_rows(&config.junction_paths().full);
        let by_id = |id: &str| rows.iter().find(|r| r[1] == id).unwrap().clone();
        assert_eq!(by_id("veh0")[6..], ["J0", "J1"]);
        assert_eq!(by_id("veh1")[6..], ["NOT_FOUND_OR_FINAL_JUNCTION"; 2]);
        assert_eq!(by_id("veh2")[4], "E404");
        assert_eq!(by_id("veh2")[7], "NOT_FOUND_OR_FINAL_JUNCTION");
    }

    #[test]
    fn header_and_gui_schema() {
        let dir = tmp();
        let config = config_in(dir.path());
        write_net(&config);
        let sim = ScriptedSimulation::new(vec![fleet(1, "E0")]);
        let probe = sim.probe();
        junction_export(&config, &command("sumo-gui"), |_: &LaunchCommand| Ok(sim), clock())
            .unwrap();
        assert_eq!(probe.gui_schema(), Some((GUI_VIEW.to_owned(), GUI_SCHEMA.to_owned())));

        let text = std::fs::read_to_string(&config.junction_paths().full).unwrap();
        assert_eq!(
            text.lines().next(),
            Some("date_time,vehicle_id,x_position,y_position,edge_id,land_id,from_node_id,next_node_id")
        );
    }

    #[test]
    fn missing_network_fails_before_launch() {
        let dir = tmp();
        let mut launched = false;
        let result = junction_export(
            &config_in(dir.path()),
            &command("sumo"),
            |_: &LaunchCommand| {
                launched = true;
                Ok(ScriptedSimulation::new(Vec::new()))
            },
            clock(),
        );
        assert!(result.is_err());
        assert!(!launched);
    }
}
