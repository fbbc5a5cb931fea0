use approx::assert_abs_diff_eq;
use model_evaluation::annotations::mask::draw_boxes;
use model_evaluation::{
    BBox, Classification, MatchingConfig, Task, evaluate_classification, evaluate_detection,
    evaluate_segmentation,
};
use ndarray::arr2;

const MASK_SHAPE: (usize, usize) = (480, 640);

#[test]
fn segmentation_example() {
    let classes = ["bkg", "kite", "person"];
    let gt_mask = draw_boxes(
        MASK_SHAPE,
        &[BBox::new(10, 10, 10, 10, 1), BBox::new(110, 110, 320, 280, 2)],
    );
    let pred_mask = draw_boxes(
        MASK_SHAPE,
        &[BBox::new(10, 10, 10, 10, 1), BBox::new(70, 50, 240, 220, 2)],
    );

    let metrics =
        evaluate_segmentation(std::iter::once(gt_mask), std::iter::once(pred_mask), &classes)
            .unwrap();

    assert_eq!(metrics.task(), Task::Segmentation);
    assert_eq!(
        metrics.confusion_matrix().view(),
        arr2(&[
            [196_700_u64, 0, 20_800],
            [0, 100, 0],
            [57_600, 0, 32_000],
        ])
    );
    assert_eq!(metrics.confusion_matrix().total(), 480 * 640);

    let kite = metrics.class("kite").unwrap();
    assert_eq!((kite.precision(), kite.recall(), kite.iou()), (1.0, 1.0, 1.0));

    let person = metrics.class("person").unwrap();
    assert_abs_diff_eq!(person.precision(), 32_000.0 / 52_800.0);
    assert_abs_diff_eq!(person.recall(), 32_000.0 / 89_600.0);
    assert_abs_diff_eq!(person.iou(), 32_000.0 / 110_400.0);
}

#[test]
fn detection_example() {
    let classes = ["kite", "person"];
    let gt = vec![BBox::new(10, 10, 10, 10, 0), BBox::new(110, 110, 320, 280, 1)];
    let pred = vec![BBox::new(10, 10, 10, 10, 0), BBox::new(70, 50, 240, 220, 1)];

    let metrics = evaluate_detection(
        std::iter::once(gt),
        std::iter::once(pred),
        &classes,
        &MatchingConfig::default(),
    )
    .unwrap();

    assert_eq!(metrics.matrix_labels(), vec!["kite", "person", "background"]);
    assert_eq!(
        metrics.confusion_matrix().view(),
        arr2(&[[1_u64, 0, 0], [0, 0, 1], [0, 1, 0]])
    );
    let kite = &metrics.by_class()[0];
    assert_eq!(kite.binary_confusion_matrix(), [[1, 0], [0, 2]]);
    let person = &metrics.by_class()[1];
    assert_eq!(person.true_positives(), 0);
    assert_eq!(metrics.macro_average().recall, 0.5);
}

#[test]
fn classification_example() {
    let classes = ["a", "b", "c"];
    let gt: Vec<Classification> = [
        0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2,
    ]
    .into_iter()
    .map(Classification::new)
    .collect();
    let pred: Vec<Classification> = [
        0, 0, 0, 0, 2, 1, 0, 0, 0, 0, 0, 0, 2, 2, 1, 1, 0, 0, 0, 2, 2, 2, 2, 2, 2,
    ]
    .into_iter()
    .map(|cls| Classification::with_score(cls, 0.8))
    .collect();

    let metrics = evaluate_classification(gt, pred, &classes).unwrap();

    assert_eq!(
        metrics.confusion_matrix().view(),
        arr2(&[[4_u64, 1, 1], [6, 2, 2], [3, 0, 6]])
    );
    assert_eq!(metrics.confusion_matrix().no_match_index(), None);
    assert_abs_diff_eq!(metrics.accuracy(), 0.48);

    let a = &metrics.by_class()[0];
    assert_eq!(a.binary_confusion_matrix(), [[4, 2], [9, 10]]);
    assert_abs_diff_eq!(a.precision(), 4.0 / 13.0);
    assert_abs_diff_eq!(a.recall(), 4.0 / 6.0);

    let b = &metrics.by_class()[1];
    assert_abs_diff_eq!(b.precision(), 2.0 / 3.0);
    assert_abs_diff_eq!(b.recall(), 0.2);

    let c = &metrics.by_class()[2];
    assert_abs_diff_eq!(c.precision(), 6.0 / 9.0);
    assert_abs_diff_eq!(c.recall(), 6.0 / 9.0);

    assert_abs_diff_eq!(
        metrics.macro_average().recall,
        (4.0 / 6.0 + 0.2 + 6.0 / 9.0) / 3.0
    );
    assert_abs_diff_eq!(
        metrics.weighted_average().recall,
        (4.0 + 2.0 + 6.0) / 25.0
    );
}

#[test]
fn perfect_predictor_gives_a_diagonal_matrix() {
    let masks: Vec<_> = (0..3_u32)
        .map(|i| {
            draw_boxes(
                (32, 32),
                &[BBox::new(i, i, 8, 8, 1), BBox::new(16, 4 * i, 10, 6, 2)],
            )
        })
        .collect();
    let metrics = evaluate_segmentation(&masks, &masks, &["bkg", "a", "b"]).unwrap();
    let matrix = metrics.confusion_matrix();
    assert_eq!(matrix.trace(), matrix.total());
    assert_eq!(matrix.total(), 3 * 32 * 32);
    for class in metrics.by_class() {
        assert_eq!(
            (class.precision(), class.recall(), class.f_score(), class.iou()),
            (1.0, 1.0, 1.0, 1.0)
        );
    }

    let boxes = vec![
        vec![BBox::new(0, 0, 5, 5, 0), BBox::new(20, 20, 5, 5, 1)],
        vec![BBox::new(3, 3, 7, 2, 1)],
    ];
    let metrics = evaluate_detection(&boxes, &boxes, &["a", "b"], &MatchingConfig::default())
        .unwrap();
    assert_eq!(metrics.confusion_matrix().trace(), 3);
    assert_eq!(metrics.confusion_matrix().total(), 3);
    assert_eq!(metrics.macro_average().f_score, 1.0);
}

#[test]
fn never_matching_predictor_has_no_true_positives() {
    let gt = vec![
        vec![BBox::new(0, 0, 10, 10, 0), BBox::new(50, 50, 10, 10, 1)],
        vec![BBox::new(5, 5, 10, 10, 1)],
    ];
    let pred = vec![
        vec![BBox::new(100, 100, 10, 10, 0), BBox::new(50, 50, 10, 10, 0)],
        vec![],
    ];
    let metrics =
        evaluate_detection(&gt, &pred, &["a", "b"], &MatchingConfig::default()).unwrap();
    // One comparison per unmatched box on either side.
    assert_eq!(metrics.confusion_matrix().total(), 5);
    for class in metrics.by_class() {
        assert_eq!(class.true_positives(), 0);
    }

    let labels = vec![0_usize, 1, 2, 0];
    let wrong = [1, 2, 0, 2].map(|cls| Classification::with_score(cls, 0.5));
    let metrics = evaluate_classification(labels, wrong, &["a", "b", "c"]).unwrap();
    assert_eq!(metrics.confusion_matrix().total(), 4);
    assert_eq!(metrics.accuracy(), 0.0);
    for class in metrics.by_class() {
        assert_eq!(class.true_positives(), 0);
    }
}
