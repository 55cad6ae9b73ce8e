pub type CmdResult<T> = batch_replace::Result<(T, i32)>;

pub mod replace;
