use ndarray::array;

use crate::seq2seq::metrics::sequence_accuracy;

#[test]
fn test_sequence_accuracy_pads_shorter_side() {
    let target = array![[4, 5, 1], [6, 1, 0]];
    let predicted = array![[4, 7], [6, 1]];
    // 补齐后 predicted = [[4, 7, 0], [6, 1, 0]]，6个位置中4个相等
    assert_eq!(sequence_accuracy(&target, &predicted, 0), 4.0 / 6.0);
    assert_eq!(sequence_accuracy(&target, &target, 0), 1.0);
}
