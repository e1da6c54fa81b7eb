pub mod stemmer;
