// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape intersection matrix.
//!
//! Print which of a handful of shapes intersect, including the boundary
//! cases where a box's excluded maximum face decides the answer.
//!
//! Run:
//! - `cargo run -p precinct_demos --example shape_pairs`

use precinct_shape::{Shape, ShapeError};

fn main() -> Result<(), ShapeError> {
    let shapes = [
        ("box", Shape::cuboid(0.0, 0.0, 0.0, 10.0, 10.0, 10.0)?),
        ("east_box", Shape::cuboid(10.0, 0.0, 0.0, 20.0, 10.0, 10.0)?),
        ("west_ball", Shape::sphere(-2.0, 5.0, 5.0, 2.0)?),
        ("east_ball", Shape::sphere(12.0, 5.0, 5.0, 2.0)?),
        ("tower", Shape::cylinder(5.0, 5.0, 10.0, 40.0, 3.0)?),
        ("floor", Shape::slab(-1.0, 0.0)?),
    ];

    print!("{:>10}", "");
    for (name, _) in &shapes {
        print!("{name:>10}");
    }
    println!();
    for (a_name, a) in &shapes {
        print!("{a_name:>10}");
        for (_, b) in &shapes {
            let mark = if a.intersects(b) { "x" } else { "." };
            print!("{mark:>10}");
        }
        println!();
    }

    // Rejected parameters come back as errors.
    match Shape::cuboid(0.0, 0.0, 0.0, 0.0, 1.0, 1.0) {
        Err(e) => println!("flat box: {e}"),
        Ok(_) => unreachable!("a zero-width box is invalid"),
    }
    Ok(())
}
