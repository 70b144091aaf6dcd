//! # 错误处理宏

/// 快速创建数据库错误的宏
#[macro_export]
macro_rules! database_error {
    ($msg:expr) => {
        $crate::error::AppError::database($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::AppError::database(format!($fmt, $($arg)*))
    };
}

/// 快速创建业务错误的宏
#[macro_export]
macro_rules! business_error {
    ($msg:expr) => {
        $crate::error::AppError::business($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::AppError::business(format!($fmt, $($arg)*))
    };
}

/// 快速创建内部错误的宏
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::AppError::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::AppError::internal(format!($fmt, $($arg)*))
    };
}

/// 快速创建验证错误的宏
#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::AppError::validation($msg, None)
    };
    ($msg:expr, $field:expr) => {
        $crate::error::AppError::validation($msg, Some($field.into()))
    };
}

/// 确保条件成立，否则返回业务错误
#[macro_export]
macro_rules! ensure_business {
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::business_error!($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::business_error!($fmt, $($arg)*));
        }
    };
}

/// 确保条件成立，否则返回验证错误
#[macro_export]
macro_rules! ensure_validation {
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::validation_error!($msg));
        }
    };
    ($cond:expr, $msg:expr, $field:expr) => {
        if !($cond) {
            return Err($crate::validation_error!($msg, $field));
        }
    };
}
