mod arbitrary;
mod parse_good;
