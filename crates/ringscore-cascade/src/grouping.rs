//! Merge raw window hits into final regions.
//!
//! Hits are partitioned into groups of similar rectangles, groups with too
//! few members are dropped, survivors are averaged, and weak groups nested
//! inside stronger ones are suppressed.

use ringscore_core::Region;

/// Relative tolerance used for both similarity and nesting tests.
pub(crate) const GROUP_EPS: f64 = 0.2;

struct Group {
    first: usize,
    count: usize,
    sum: [usize; 4],
}

/// Group `hits` and return averaged regions, clamped to `bounds`.
///
/// Output order follows the first hit of each group.
pub(crate) fn group_regions(
    hits: &[Region],
    min_neighbors: usize,
    eps: f64,
    bounds: (usize, usize),
) -> Vec<Region> {
    if hits.is_empty() {
        return Vec::new();
    }

    let mut parent: Vec<usize> = (0..hits.len()).collect();
    for i in 0..hits.len() {
        for j in (i + 1)..hits.len() {
            if similar(&hits[i], &hits[j], eps) {
                union(&mut parent, i, j);
            }
        }
    }

    let mut groups: Vec<Group> = Vec::new();
    let mut slot_of_root: Vec<Option<usize>> = vec![None; hits.len()];
    for (idx, hit) in hits.iter().enumerate() {
        let root = find(&mut parent, idx);
        let slot = match slot_of_root[root] {
            Some(slot) => slot,
            None => {
                groups.push(Group {
                    first: idx,
                    count: 0,
                    sum: [0; 4],
                });
                slot_of_root[root] = Some(groups.len() - 1);
                groups.len() - 1
            }
        };
        let g = &mut groups[slot];
        g.count += 1;
        g.sum[0] += hit.x;
        g.sum[1] += hit.y;
        g.sum[2] += hit.width;
        g.sum[3] += hit.height;
    }
    groups.sort_by_key(|g| g.first);

    let kept: Vec<(Region, usize)> = groups
        .iter()
        .filter(|g| g.count >= min_neighbors)
        .map(|g| {
            let avg = |s: usize| (s as f64 / g.count as f64).round() as usize;
            let r = Region::new(avg(g.sum[0]), avg(g.sum[1]), avg(g.sum[2]), avg(g.sum[3]));
            (r.clamp_to(bounds.0, bounds.1), g.count)
        })
        .collect();

    kept.iter()
        .enumerate()
        .filter(|(i, (r1, n1))| {
            !kept
                .iter()
                .enumerate()
                .any(|(j, (r2, n2))| *i != j && nested(r1, r2, eps) && (*n2 > (*n1).max(3) || *n1 < 3))
        })
        .map(|(_, (r, _))| *r)
        .collect()
}

fn similar(a: &Region, b: &Region, eps: f64) -> bool {
    let delta = eps * (a.width.min(b.width) + a.height.min(b.height)) as f64 * 0.5;
    let close = |p: usize, q: usize| (p as f64 - q as f64).abs() <= delta;
    close(a.x, b.x) && close(a.y, b.y) && close(a.right(), b.right()) && close(a.bottom(), b.bottom())
}

/// `inner` lies inside `outer` up to an `eps`-relative margin of `outer`.
fn nested(inner: &Region, outer: &Region, eps: f64) -> bool {
    let dx = outer.width as f64 * eps;
    let dy = outer.height as f64 * eps;
    inner.x as f64 >= outer.x as f64 - dx
        && inner.y as f64 >= outer.y as f64 - dy
        && inner.right() as f64 <= outer.right() as f64 + dx
        && inner.bottom() as f64 <= outer.bottom() as f64 + dy
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        parent[rb.max(ra)] = ra.min(rb);
    }
}
