/// End-to-end tests: build snapshots → encode → decode → unpack.
use bitgrid::config::{BoardConfig, RED, WHITE};
use bitgrid::error::{DecodeError, TransportError};
use bitgrid::grid::PackedGrid;
use bitgrid::pack::pack_rgba;
use bitgrid::pipeline::{decode_board, decode_board_into};
use bitgrid::transport;
use bitgrid::unpack::Coverage;

/// A checkerboard with a diagonal stripe, on the full 1000x1000 board.
fn sample_board(config: &BoardConfig) -> PackedGrid {
    let w = config.width as usize;
    PackedGrid::from_cells((0..config.cells()).map(|i| {
        let (x, y) = (i % w, i / w);
        (x / 10 + y / 10) % 2 == 0 || x == y
    }))
}

#[test]
fn full_board_round_trip() {
    let config = BoardConfig::default();
    let grid = sample_board(&config);
    assert_eq!(grid.as_bytes().len(), 125_000);

    let text = transport::encode(grid.as_bytes());
    let frame = decode_board(&text, &config).unwrap();

    assert_eq!(frame.report.coverage, Coverage::Exact);
    assert_eq!(frame.report.cells_written, 1_000_000);
    assert_eq!(frame.report.set_count, grid.count_set());

    for (i, px) in frame.raster.pixels().enumerate() {
        let expected = if grid.get(i).unwrap() { RED } else { WHITE };
        assert_eq!(px, expected, "cell {i}");
    }

    let repacked = pack_rgba(&frame.raster.buf, &config).unwrap();
    assert_eq!(repacked, grid);
}

#[test]
fn host_owned_buffer_is_filled_in_place() {
    let config = BoardConfig::default();
    let mut rgba = vec![0u8; config.raster_len()];
    let text = transport::encode(&vec![0u8; config.packed_len()]);

    let report = decode_board_into(&text, &config, &mut rgba).unwrap();

    assert_eq!(report.set_count, 0);
    assert!(rgba.chunks_exact(4).all(|px| px == WHITE));
}

#[test]
fn half_delivered_snapshot_is_reported() {
    let config = BoardConfig::default();
    let text = transport::encode(&vec![0xffu8; 62_500]);
    let frame = decode_board(&text, &config).unwrap();

    assert_eq!(
        frame.report.coverage,
        Coverage::Truncated {
            missing_cells: 500_000
        }
    );
    assert_eq!(frame.report.set_count, 500_000);
    assert_eq!(frame.raster.pixel(999, 499), RED);
    assert_eq!(frame.raster.pixel(0, 500), [0, 0, 0, 0]);
}

#[test]
fn malformed_snapshot_fails_before_unpacking() {
    let config = BoardConfig::default();
    let mut rgba = vec![42u8; config.raster_len()];
    let err = decode_board_into("not-valid-base64!!", &config, &mut rgba).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Transport(TransportError::InvalidByte { .. })
    ));
    assert!(rgba.iter().all(|&b| b == 42));
}

#[test]
fn non_square_board() {
    let config = BoardConfig::new(7, 3);
    let grid = PackedGrid::from_cells((0..21).map(|i| i % 7 == 6));
    let frame = decode_board(&transport::encode(grid.as_bytes()), &config).unwrap();
    for y in 0..3 {
        assert_eq!(frame.raster.pixel(6, y), RED);
        assert_eq!(frame.raster.pixel(5, y), WHITE);
    }
    assert_eq!(frame.report.set_count, 3);
}
