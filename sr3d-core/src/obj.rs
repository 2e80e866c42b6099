//! Wavefront OBJ parser
//!
//! Reads vertex positions (`v`), vertex normals (`vn`) and faces (`f`).
//! Every other statement, including texture coordinates, groups and
//! materials, is skipped.

use nom::{
    bytes::complete::tag,
    character::complete::{char, i64 as index, space0, space1},
    combinator::{all_consuming, opt},
    multi::separated_list1,
    number::complete::float,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::error::MeshError;
use crate::geometry::{Mesh, Triangle, Vertex};
use crate::math::Vector3;

/// One corner of a face: 1-based (or negative, relative) position and
/// normal indices as written in the file.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Corner {
    v: i64,
    vn: Option<i64>,
}

/// Parse OBJ text into an unrolled mesh
///
/// Polygons are split into triangle fans around their first corner. Each
/// triangle gets three vertices of its own. If all three corners reference a
/// normal those are used, otherwise the flat face normal is assigned to all
/// three.
pub fn parse_obj(input: &str) -> Result<Mesh, MeshError> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut triangles = Vec::new();

    for (n, raw) in input.lines().enumerate() {
        let line_no = n + 1;
        let line = raw.split('#').next().unwrap_or_default().trim();
        let error = |reason: String| MeshError::Parse {
            line: line_no,
            reason,
        };

        match line.split_whitespace().next() {
            Some("v") => {
                let (_, p) = all_consuming(position)(line)
                    .map_err(|_| error("expected `v x y z [w]`".into()))?;
                positions.push(p);
            }
            Some("vn") => {
                let (_, n) = all_consuming(normal)(line)
                    .map_err(|_| error("expected `vn x y z`".into()))?;
                normals.push(n);
            }
            Some("f") => {
                let (_, corners) = all_consuming(face)(line)
                    .map_err(|_| error("malformed face".into()))?;
                if corners.len() < 3 {
                    return Err(error(format!(
                        "face has {} vertices, needs at least 3",
                        corners.len()
                    )));
                }
                let resolved = corners
                    .iter()
                    .map(|c| {
                        let position = resolve(c.v, &positions).ok_or_else(|| {
                            error(format!("vertex index {} out of range", c.v))
                        })?;
                        let normal = match c.vn {
                            Some(i) => Some(resolve(i, &normals).ok_or_else(|| {
                                error(format!("normal index {i} out of range"))
                            })?),
                            None => None,
                        };
                        Ok((position, normal))
                    })
                    .collect::<Result<Vec<_>, MeshError>>()?;

                for k in 1..resolved.len() - 1 {
                    triangles.push(triangle(resolved[0], resolved[k], resolved[k + 1]));
                }
            }
            _ => {}
        }
    }

    Ok(Mesh::from_triangles(triangles))
}

fn triangle(
    a: (Vector3, Option<Vector3>),
    b: (Vector3, Option<Vector3>),
    c: (Vector3, Option<Vector3>),
) -> Triangle {
    match (a.1, b.1, c.1) {
        (Some(na), Some(nb), Some(nc)) => Triangle::new(
            Vertex::new(a.0, na),
            Vertex::new(b.0, nb),
            Vertex::new(c.0, nc),
        ),
        _ => {
            let mut t = Triangle::new(
                Vertex::new(a.0, Vector3::zeros()),
                Vertex::new(b.0, Vector3::zeros()),
                Vertex::new(c.0, Vector3::zeros()),
            );
            t.flatten_normals();
            t
        }
    }
}

/// Looks up a 1-based index, or a negative one counting back from the end.
fn resolve(i: i64, items: &[Vector3]) -> Option<Vector3> {
    let i = if i > 0 {
        i - 1
    } else if i < 0 {
        items.len() as i64 + i
    } else {
        return None;
    };
    usize::try_from(i).ok().and_then(|i| items.get(i)).copied()
}

fn position(input: &str) -> IResult<&str, Vector3> {
    let (input, _) = pair(char('v'), space1)(input)?;
    let (input, v) = vector3(input)?;
    // Optional homogeneous weight, ignored
    let (input, _) = opt(preceded(space1, float))(input)?;
    Ok((input, v))
}

fn normal(input: &str) -> IResult<&str, Vector3> {
    let (input, _) = pair(tag("vn"), space1)(input)?;
    vector3(input)
}

fn face(input: &str) -> IResult<&str, Vec<Corner>> {
    let (input, _) = pair(char('f'), space1)(input)?;
    delimited(space0, separated_list1(space1, corner), space0)(input)
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`
fn corner(input: &str) -> IResult<&str, Corner> {
    let (input, v) = index(input)?;
    let (input, rest) = opt(preceded(
        char('/'),
        pair(opt(index), opt(preceded(char('/'), index))),
    ))(input)?;
    let vn = rest.and_then(|(_vt, vn)| vn);
    Ok((input, Corner { v, vn }))
}

fn vector3(input: &str) -> IResult<&str, Vector3> {
    let (input, (x, _, y, _, z)) = tuple((float, space1, float, space1, float))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}
