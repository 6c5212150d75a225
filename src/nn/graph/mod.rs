/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 计算图模块
 *
 * - error.rs: GraphError
 * - handle.rs: Graph 句柄（用户级 API）
 * - inner/: GraphInner 底层实现
 */

mod error;
mod handle;
mod inner;

pub use error::GraphError;
pub use handle::Graph;
pub use inner::GraphInner;
