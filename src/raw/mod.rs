pub(crate) mod avl;
mod balance;
mod iter;

pub(crate) use iter::RawIter;
