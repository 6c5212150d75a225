/*
 * @Author       : 老董
 * @Date         : 2026-02-14
 * @Description  : 评估指标
 */

use ndarray::Array2;

/// 逐位置准确率：两者中较窄的一方先在右侧补`pad_id`到相同宽度，再统计相等位置的比例
pub fn sequence_accuracy(target: &Array2<usize>, predicted: &Array2<usize>, pad_id: usize) -> f32 {
    let rows = target.nrows().max(predicted.nrows());
    let cols = target.ncols().max(predicted.ncols());
    if rows == 0 || cols == 0 {
        return 0.0;
    }
    let at = |m: &Array2<usize>, r: usize, c: usize| m.get((r, c)).copied().unwrap_or(pad_id);
    let equal = (0..rows)
        .flat_map(|r| (0..cols).map(move |c| (r, c)))
        .filter(|&(r, c)| at(target, r, c) == at(predicted, r, c))
        .count();
    equal as f32 / (rows * cols) as f32
}
