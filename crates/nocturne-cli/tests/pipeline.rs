//! End-to-end pipeline tests up to the encode stage.
//!
//! The render stage needs a real FluidSynth install, so these runs stop
//! after encoding and verify the MIDI artifact structurally.

use nocturne_cli::commands::pipeline::{run, PipelineArgs};
use nocturne_midi::validator::{decode_smf, validate_smf_bytes};

#[test]
fn pipeline_writes_valid_midi_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(
        &notes,
        "[{'note': 60, 'start_time': 0.0, 'duration': 0.5, 'velocity': 100},\
          {'note': 64, 'start_time': 0.5, 'duration': 0.5, 'velocity': 100}]",
    )
    .unwrap();

    let out_dir = dir.path().join("out");
    let args = PipelineArgs {
        notes_path: notes.to_str().unwrap(),
        mood: "sad",
        tempo_bpm: 120,
        output_dir: out_dir.to_str().unwrap(),
        title: "dirge",
        sound_font: None,
        no_render: true,
    };
    run(&args, true).unwrap();

    let midi_path = out_dir.join("dirge.mid");
    let data = std::fs::read(&midi_path).unwrap();
    validate_smf_bytes(&data).unwrap();
    let decoded = decode_smf(&data).unwrap();
    assert_eq!(decoded.notes.len(), 2);
    assert_eq!(decoded.tempo_microseconds_per_beat, Some(500_000));
}

#[test]
fn pipeline_rejects_malformed_melody() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "[{'note': 60}]").unwrap();

    let out_dir = dir.path().join("out");
    let args = PipelineArgs {
        notes_path: notes.to_str().unwrap(),
        mood: "sad",
        tempo_bpm: 120,
        output_dir: out_dir.to_str().unwrap(),
        title: "dirge",
        sound_font: None,
        no_render: true,
    };
    // The command reports the failure through its exit code, not an Err.
    run(&args, true).unwrap();
    assert!(!out_dir.join("dirge.mid").exists());
}
