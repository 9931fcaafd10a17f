mod sequence;
mod utils;
