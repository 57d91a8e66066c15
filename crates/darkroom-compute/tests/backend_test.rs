//! Integration tests for backend selection and the tiled execution driver.

use darkroom_compute::{describe_backends, Backend, GpuLimits, TiledRunner};

#[test]
fn cpu_backend_is_always_available() {
    assert!(Backend::Cpu.is_available());
}

#[test]
fn auto_backend_resolves_to_a_concrete_backend() {
    let resolved = Backend::Auto.resolve();
    assert_ne!(resolved, Backend::Auto);
}

#[test]
fn describe_backends_lists_cpu() {
    let desc = describe_backends();
    assert!(desc.contains("CPU"));
}

#[test]
fn single_pass_strategy_leaves_a_small_image_unchanged() {
    let limits = GpuLimits::with_vram(8 * 1024 * 1024 * 1024);
    let runner = TiledRunner::new(limits);
    let src = vec![0.25f32; 16 * 16 * 3];

    let out = runner.run(&src, 16, 16, 3, |tile, _w, _h, _c| tile.to_vec());
    assert_eq!(out, src);
}

#[test]
fn tiled_strategy_matches_single_pass_for_a_pointwise_kernel() {
    let small_limits = GpuLimits::with_vram(64 * 1024 * 1024);
    let runner = TiledRunner::with_halo(small_limits, 4);
    let src: Vec<f32> = (0..(64 * 64 * 3)).map(|i| (i % 251) as f32 / 251.0).collect();

    let double = |tile: &[f32], _w: u32, _h: u32, _c: u32| tile.iter().map(|v| v * 2.0).collect::<Vec<_>>();
    let out = runner.run(&src, 64, 64, 3, double);
    let expected: Vec<f32> = src.iter().map(|v| v * 2.0).collect();

    assert_eq!(out.len(), expected.len());
    for (a, b) in out.iter().zip(expected.iter()) {
        assert!((a - b).abs() < 1e-6);
    }
}
