//! Integration tests for the patch pipeline: extraction, classification,
//! risk aggregation, and the self-play loop.

use ndarray::Array2;
use proptest::prelude::*;

use sweeper_rl::board::{BoardGrid, BoardSim, GameStatus, MineBoard, HIDDEN, MINE};
use sweeper_rl::core::{GameRng, TrainerConfig};
use sweeper_rl::nn::PatchClassifier;
use sweeper_rl::patch::{labeled_batch, PatchExtractor};
use sweeper_rl::policy::{predict_risk_map, RiskMap};
use sweeper_rl::training::{Evaluator, Trainer};

fn hidden_grid(width: usize, height: usize) -> BoardGrid {
    BoardGrid::new(vec![HIDDEN; width * height], width, height)
}

fn classifier(seed: u64) -> PatchClassifier {
    let mut rng = GameRng::new(seed);
    PatchClassifier::new(9, 100, 9, &mut rng)
}

// =============================================================================
// Patch Extraction
// =============================================================================

#[test]
fn test_reference_board_yields_36_patches() {
    let extractor = PatchExtractor::new(3);
    let x = extractor.features(&hidden_grid(8, 8));
    assert_eq!(x.shape(), &[36, 9]);
}

#[test]
fn test_labels_align_with_features() {
    let mut rng = GameRng::new(42);
    let mut board = MineBoard::new();
    board.reset(3, 8, 8, &mut rng);

    let extractor = PatchExtractor::new(3);
    let features = extractor.features(&board.grid());
    let labels = extractor.labels(&board);
    assert_eq!(features.nrows(), labels.len());

    // Each labeled window really covers a mine at the labeled position.
    for (patch, label) in labels.iter().enumerate() {
        if let Some(pos) = label {
            let (row, col) = extractor.cell_of(patch, *pos, board.width());
            assert_eq!(board.value_at(row, col), MINE);
        }
    }
}

#[test]
fn test_mined_board_always_has_labels() {
    // Every cell sits inside at least one window, so a board with mines
    // always yields a non-empty learning batch.
    for seed in 0..20 {
        let mut rng = GameRng::new(seed);
        let mut board = MineBoard::new();
        board.reset(3, 8, 8, &mut rng);

        let extractor = PatchExtractor::new(3);
        let features = extractor.features(&board.grid());
        let labels = extractor.labels(&board);
        assert!(labeled_batch(&features, &labels).is_some());
    }
}

// =============================================================================
// Classifier
// =============================================================================

#[test]
fn test_forward_shape_matches_patch_batch() {
    let extractor = PatchExtractor::new(3);
    let x = extractor.features(&hidden_grid(8, 8));
    let scores = classifier(42).forward(&x);
    assert_eq!(scores.shape(), &[36, 9]);
}

#[test]
fn test_loss_repeats_bit_identically() {
    let net = classifier(42);
    let x = Array2::from_shape_fn((6, 9), |(i, j)| ((i + j) % 5) as f32 * 0.01);
    let labels = vec![0, 1, 2, 3, 4, 5];

    let (loss1, _) = net.loss(&x, &labels, 5e-6).unwrap();
    let (loss2, _) = net.loss(&x, &labels, 5e-6).unwrap();
    assert!(loss1 >= 0.0);
    assert_eq!(loss1.to_bits(), loss2.to_bits());
}

#[test]
fn test_gradient_step_descends() {
    let mut net = classifier(42);
    let x = Array2::from_shape_fn((6, 9), |(i, j)| ((i * 3 + j) % 7) as f32 * 0.01);
    let labels = vec![8, 0, 4, 2, 6, 1];

    let (before, grads) = net.loss(&x, &labels, 0.0).unwrap();
    net.step(&grads, 1e-2);
    let (after, _) = net.loss(&x, &labels, 0.0).unwrap();
    assert!(after < before);
}

// =============================================================================
// Risk Aggregation & Move Selection
// =============================================================================

#[test]
fn test_overlapping_votes_take_maximum() {
    let mut map = RiskMap::new(3, 3);
    map.vote(1, 1, 0.3);
    map.vote(1, 1, 0.7);
    assert_eq!(map.score(1, 1), 0.7);
}

#[test]
fn test_selected_moves_are_always_hidden() {
    let mut rng = GameRng::new(42);
    let net = classifier(7);
    let extractor = PatchExtractor::new(3);
    let mut board = MineBoard::new();

    for seed_move in 0..10 {
        board.reset(3, 8, 8, &mut rng);
        board.reveal(seed_move % 8, (seed_move * 3) % 8);

        while board.status() == GameStatus::InProgress {
            let grid = board.grid();
            let mut risk = predict_risk_map(&net, &extractor, &grid);
            match risk.select_move(&grid) {
                Some((row, col)) => {
                    assert_eq!(grid.at(row, col), HIDDEN);
                    board.reveal(row, col);
                }
                None => break,
            }
        }
        assert!(board.status().is_terminal());
    }
}

// =============================================================================
// End-to-End Training
// =============================================================================

#[test]
fn test_smoke_training_run() {
    let config = TrainerConfig::default()
        .with_board(5, 5)
        .with_mines(2)
        .with_eval_cadence(20, 10, 5);
    let mut trainer = Trainer::new(MineBoard::new(), config, 42);
    let report = trainer.train(60);

    assert_eq!(report.episodes, 60);
    assert_eq!(report.wins + report.losses, 60);
    assert!(!report.loss_history.is_empty());
    assert!(report.loss_history.iter().all(|l| l.is_finite()));
    // Evaluations ran at episodes 20 and 40.
    assert_eq!(report.eval_history.len(), 2);
    assert!(report
        .eval_history
        .iter()
        .all(|&(_, rate)| (0.0..=1.0).contains(&rate)));
}

#[test]
fn test_trained_classifier_plays_full_games() {
    let config = TrainerConfig::default()
        .with_board(5, 5)
        .with_mines(2)
        .with_eval_cadence(0, 0, 0);
    let mut trainer = Trainer::new(MineBoard::new(), config.clone(), 42);
    trainer.train(100);
    let net = trainer.into_classifier();

    let mut rng = GameRng::new(123);
    let mut board = MineBoard::new();
    let evaluator = Evaluator::from_config(&config);
    let rate = evaluator.win_rate(&mut board, &net, 30, &mut rng);
    assert!((0.0..=1.0).contains(&rate));
}

#[test]
fn test_full_run_reproducible() {
    let config = TrainerConfig::default()
        .with_board(5, 5)
        .with_mines(2)
        .with_eval_cadence(10, 5, 3);

    let report1 = Trainer::new(MineBoard::new(), config.clone(), 99).train(30);
    let report2 = Trainer::new(MineBoard::new(), config, 99).train(30);
    assert_eq!(report1, report2);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_patch_count((width, height) in (3usize..12, 3usize..12)) {
        let extractor = PatchExtractor::new(3);
        let x = extractor.features(&hidden_grid(width, height));
        prop_assert_eq!(x.nrows(), (height - 2) * (width - 2));
        prop_assert_eq!(x.ncols(), 9);
    }

    #[test]
    fn prop_fold_touches_every_cell((width, height) in (3usize..12, 3usize..12)) {
        // A zero vote from every window position must still visit every
        // cell: no sentinel survives and no index goes out of bounds.
        let extractor = PatchExtractor::new(3);
        let mut map = RiskMap::new(height, width);
        for patch in 0..extractor.patch_count(width, height) {
            for position in 0..9 {
                let (row, col) = extractor.cell_of(patch, position, width);
                prop_assert!(row < height && col < width);
                map.vote(row, col, 0.0);
            }
        }
        prop_assert!(map.scores().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn prop_select_move_respects_hidden(seed in 0u64..500) {
        let mut rng = GameRng::new(seed);
        // Random mix of revealed and hidden cells.
        let cells: Vec<i32> = (0..25)
            .map(|_| if rng.gen_bool(0.5) { HIDDEN } else { 3 })
            .collect();
        let grid = BoardGrid::new(cells, 5, 5);

        let mut map = RiskMap::new(5, 5);
        for row in 0..5 {
            for col in 0..5 {
                map.vote(row, col, rng.gen_f32());
            }
        }

        match map.select_move(&grid) {
            Some((row, col)) => prop_assert_eq!(grid.at(row, col), HIDDEN),
            None => prop_assert!(grid.hidden_cells().is_empty()),
        }
    }
}
