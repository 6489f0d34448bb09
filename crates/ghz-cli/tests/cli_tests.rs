//! CLI argument parsing and command tests.
//!
//! Parsing is checked through clap's `try_parse_from`; command bodies are
//! driven through the library surface so no process is spawned.

// ============================================================================
// Clap argument parsing
// ============================================================================

mod clap_parsing {
    use clap::Parser;
    use ghz_adapter_sim::SimulationMethod;
    use ghz_cli::{CircuitFormat, Cli, Commands, OutputFormat, RunArgs};

    #[test]
    fn test_no_subcommand_runs_demo() {
        let cli = Cli::try_parse_from(["ghz"]).unwrap();
        assert!(cli.command.is_none());
        match cli.into_command() {
            Commands::Run(args) => assert_eq!(args, RunArgs::default()),
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_default_run_matches_demo() {
        let args = RunArgs::default();
        assert_eq!(args.qubits, 34);
        assert_eq!(args.shots, 1000);
        assert_eq!(args.backend, SimulationMethod::Auto);
        assert_eq!(args.seed, None);
        assert_eq!(args.format, OutputFormat::Dump);
    }

    #[test]
    fn test_parse_run_minimal() {
        let cli = Cli::try_parse_from(["ghz", "run"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.qubits, 34);
                assert_eq!(args.shots, 1000);
                assert_eq!(args.backend, SimulationMethod::Auto);
                assert_eq!(args.format, OutputFormat::Dump);
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_run_with_all_args() {
        let cli = Cli::try_parse_from([
            "ghz",
            "run",
            "-n",
            "8",
            "-s",
            "256",
            "-b",
            "stabilizer",
            "--seed",
            "42",
            "-f",
            "json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.qubits, 8);
                assert_eq!(args.shots, 256);
                assert_eq!(args.backend, SimulationMethod::Stabilizer);
                assert_eq!(args.seed, Some(42));
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_run_backend_alias() {
        let cli = Cli::try_parse_from(["ghz", "run", "--backend", "sv"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => assert_eq!(args.backend, SimulationMethod::Statevector),
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_run_unknown_backend() {
        assert!(Cli::try_parse_from(["ghz", "run", "-b", "gpu"]).is_err());
    }

    #[test]
    fn test_parse_run_unknown_format() {
        assert!(Cli::try_parse_from(["ghz", "run", "-f", "yaml"]).is_err());
    }

    #[test]
    fn test_parse_run_non_numeric_qubits() {
        assert!(Cli::try_parse_from(["ghz", "run", "-n", "many"]).is_err());
    }

    #[test]
    fn test_parse_qubits_out_of_range() {
        for n in ["0", "1025", "4000000000"] {
            assert!(Cli::try_parse_from(["ghz", "run", "-n", n]).is_err(), "run -n {n}");
            assert!(
                Cli::try_parse_from(["ghz", "circuit", "-n", n]).is_err(),
                "circuit -n {n}"
            );
        }
        let cli = Cli::try_parse_from(["ghz", "circuit", "-n", "1024"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Circuit { qubits: 1024, .. })));
    }

    #[test]
    fn test_parse_circuit_default() {
        let cli = Cli::try_parse_from(["ghz", "circuit"]).unwrap();
        match cli.command {
            Some(Commands::Circuit { qubits, format }) => {
                assert_eq!(qubits, 34);
                assert_eq!(format, CircuitFormat::Text);
            }
            other => panic!("expected Circuit, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_circuit_qasm() {
        let cli = Cli::try_parse_from(["ghz", "circuit", "-n", "3", "--format", "qasm"]).unwrap();
        match cli.command {
            Some(Commands::Circuit { qubits, format }) => {
                assert_eq!(qubits, 3);
                assert_eq!(format, CircuitFormat::Qasm);
            }
            other => panic!("expected Circuit, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_backends() {
        let cli = Cli::try_parse_from(["ghz", "backends"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Backends)));
    }

    #[test]
    fn test_parse_version() {
        let cli = Cli::try_parse_from(["ghz", "version"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Version)));
    }

    #[test]
    fn test_parse_verbose_levels() {
        let cases = [
            (vec!["ghz", "version"], 0, "warn"),
            (vec!["ghz", "-v", "version"], 1, "info"),
            (vec!["ghz", "-vv", "version"], 2, "debug"),
            (vec!["ghz", "version", "-vvv"], 3, "trace"),
        ];
        for (argv, level, filter) in cases {
            let cli = Cli::try_parse_from(argv).unwrap();
            assert_eq!(cli.verbose, level);
            assert_eq!(cli.log_filter(), filter);
        }
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(Cli::try_parse_from(["ghz", "foobar"]).is_err());
    }
}

// ============================================================================
// commands::circuit
// ============================================================================

mod circuit_rendering {
    use ghz_cli::CircuitFormat;
    use ghz_cli::commands::circuit::render;
    use ghz_ir::ghz_state;

    #[test]
    fn test_render_text() {
        let kernel = ghz_state(3).unwrap();
        let text = render(&kernel, CircuitFormat::Text).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "kernel ghz_3 (3 qubits)");
        assert_eq!(lines[1].trim(), "h q[0]");
        assert_eq!(lines[2].trim(), "cx q[0], q[1]");
        assert_eq!(lines[3].trim(), "cx q[1], q[2]");
        assert!(lines[4].trim().starts_with("mz"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_render_qasm() {
        let kernel = ghz_state(2).unwrap();
        let qasm = render(&kernel, CircuitFormat::Qasm).unwrap();
        assert!(qasm.starts_with("OPENQASM 3.0;"));
        assert!(qasm.contains("qubit[2] q;"));
        assert!(qasm.contains("h q[0];"));
        assert!(qasm.contains("cx q[0], q[1];"));
        assert!(qasm.contains("c[1] = measure q[1];"));
    }

    #[test]
    fn test_render_json() {
        let kernel = ghz_state(34).unwrap();
        let json = render(&kernel, CircuitFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "ghz_34");
        assert_eq!(value["num_qubits"], 34);
        // h + 33 cx + mz
        assert_eq!(value["instructions"].as_array().unwrap().len(), 35);
    }

    #[test]
    fn test_circuit_rejects_zero_qubits() {
        assert!(ghz_cli::commands::circuit::execute(0, CircuitFormat::Text).is_err());
    }
}

// ============================================================================
// commands::run and commands::common
// ============================================================================

mod run_command {
    use ghz_adapter_sim::SimulationMethod;
    use ghz_cli::commands::common::{create_backend, format_dump, format_json};
    use ghz_cli::commands::run::sample_ghz;
    use ghz_cli::{OutputFormat, RunArgs};
    use ghz_hal::Backend;

    fn args(qubits: u32, shots: u32, backend: SimulationMethod) -> RunArgs {
        RunArgs {
            qubits,
            shots,
            backend,
            seed: Some(2024),
            format: OutputFormat::Dump,
        }
    }

    #[test]
    fn test_create_backend() {
        let backend = create_backend(SimulationMethod::Stabilizer, Some(1)).unwrap();
        assert_eq!(backend.name(), "simulator");
        assert_eq!(backend.method(), SimulationMethod::Stabilizer);
        assert!(backend.capabilities().is_simulator);
    }

    #[tokio::test]
    async fn test_demo_run_is_correlated() {
        let result = sample_ghz(&args(34, 1000, SimulationMethod::Auto))
            .await
            .unwrap();
        let zeros = "0".repeat(34);
        let ones = "1".repeat(34);

        assert_eq!(result.shots, 1000);
        assert_eq!(result.counts.total_shots(), 1000);
        assert_eq!(result.counts.get(&zeros) + result.counts.get(&ones), 1000);
    }

    #[tokio::test]
    async fn test_dump_format() {
        let result = sample_ghz(&args(3, 200, SimulationMethod::Statevector))
            .await
            .unwrap();
        let dump = format_dump(&result);
        assert!(dump.starts_with("{ 000:"));
        assert!(dump.contains(" 111:"));
        assert!(dump.ends_with(" }"));
    }

    #[tokio::test]
    async fn test_json_format() {
        let result = sample_ghz(&args(2, 100, SimulationMethod::Auto))
            .await
            .unwrap();
        let json = format_json(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["shots"], 100);
        let total = value["counts"]["00"].as_u64().unwrap_or(0)
            + value["counts"]["11"].as_u64().unwrap_or(0);
        assert_eq!(total, 100);
    }

    #[tokio::test]
    async fn test_same_seed_same_histogram() {
        let a = sample_ghz(&args(5, 300, SimulationMethod::Auto)).await.unwrap();
        let b = sample_ghz(&args(5, 300, SimulationMethod::Auto)).await.unwrap();
        assert_eq!(a.counts, b.counts);
    }

    #[tokio::test]
    async fn test_statevector_too_large() {
        let err = sample_ghz(&args(34, 10, SimulationMethod::Statevector))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("statevector"));
    }

    #[tokio::test]
    async fn test_zero_qubits_rejected() {
        assert!(sample_ghz(&args(0, 10, SimulationMethod::Auto)).await.is_err());
    }

    #[tokio::test]
    async fn test_zero_shots_rejected() {
        assert!(sample_ghz(&args(3, 0, SimulationMethod::Auto)).await.is_err());
    }
}
