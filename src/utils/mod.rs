//! # 单元测试辅助宏
//!
//! `assert_panic!` 校验表达式会 panic（可选校验消息），
//! `assert_err!` 校验 Result 为 Err（可选匹配错误变体）。

/// panic 断言宏
///
/// # 用法
/// - `assert_panic!(expr)`：只验证会 panic
/// - `assert_panic!(expr, msg)`：同时验证 panic 消息（与`msg.to_string()`逐字比较）
#[macro_export]
macro_rules! assert_panic {
    ($expr:expr) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $expr)) {
            Ok(_) => panic!("表达式没有触发panic"),
            Err(_) => (),
        }
    };
    ($expr:expr, $expected_msg:expr) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $expr)) {
            Ok(_) => panic!("表达式没有触发panic"),
            Err(err) => {
                let expected_msg_str = $expected_msg.to_string();
                if let Some(msg) = err.downcast_ref::<&'static str>() {
                    assert_eq!(*msg, expected_msg_str, "panic消息与预期不符");
                } else if let Some(msg) = err.downcast_ref::<String>() {
                    assert_eq!(*msg, expected_msg_str, "panic消息与预期不符");
                } else {
                    panic!(
                        "未找到预期的panic消息，预期的panic消息为: {}",
                        expected_msg_str
                    );
                }
            }
        }
    };
}

/// 错误断言宏
///
/// # 用法
/// - `assert_err!(expr)`：只验证是 Err
/// - `assert_err!(expr, Pattern { .. })`：验证错误类型
/// - `assert_err!(expr, Pattern(msg) if condition)`：验证类型 + 条件
///
/// # 示例
/// ```ignore
/// assert_err!(result, GraphError::ShapeMismatch { expected, .. } if expected == &[2, 2]);
/// assert_err!(result, VocabError::UnknownKey(key) if key == "<GO>");
/// ```
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match &$expr {
            Err(_) => (),
            Ok(v) => panic!("预期 Err，实际得到 Ok({:?})", v),
        }
    };
    ($expr:expr, $pattern:pat) => {
        match &$expr {
            Err($pattern) => (),
            Err(e) => panic!(
                "错误类型不匹配：预期 `{}`，实际得到 `{:?}`",
                stringify!($pattern),
                e
            ),
            Ok(v) => panic!("预期 Err({})，实际得到 Ok({:?})", stringify!($pattern), v),
        }
    };
    ($expr:expr, $pattern:pat if $cond:expr) => {
        match &$expr {
            Err($pattern) if $cond => (),
            Err(e) => panic!(
                "错误不满足条件：预期 `{} if {}`，实际得到 `{:?}`",
                stringify!($pattern),
                stringify!($cond),
                e
            ),
            Ok(v) => panic!("预期 Err({})，实际得到 Ok({:?})", stringify!($pattern), v),
        }
    };
}
