pub mod fixtures;

#[cfg(test)]
mod adapters;
#[cfg(test)]
mod codegen;
#[cfg(test)]
mod columns;
#[cfg(test)]
mod filtering;
#[cfg(test)]
mod sorting;
