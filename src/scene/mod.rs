pub(crate) mod surface;
