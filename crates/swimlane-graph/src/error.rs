use crate::CellId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("cell {cell} does not exist")]
    UnknownCell { cell: CellId },

    #[error("cell {cell} is not a vertex")]
    NotAVertex { cell: CellId },

    #[error("cell {cell} is not an edge")]
    NotAnEdge { cell: CellId },

    #[error("cell {cell} cannot be used as an edge terminal")]
    InvalidTerminal { cell: CellId },
}

pub type Result<T> = std::result::Result<T, Error>;
